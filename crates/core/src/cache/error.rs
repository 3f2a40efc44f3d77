use thiserror::Error;

/// Errors that can occur during count cache operations.
///
/// A miss is not an error; these variants only describe a cache that could
/// not answer at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Count cache unreachable: {0}")]
    ConnectionFailed(String),
    #[error("Count cache command failed: {0}")]
    OperationFailed(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
