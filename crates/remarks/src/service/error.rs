use thiserror::Error;

use remarks_core::audience::{owner_lookup_error_to_status_code, OwnerLookupError};
use remarks_core::comment::{comment_error_to_status_code, CommentError};
use remarks_core::storage::{repository_error_to_status_code, RepositoryError};

/// Errors surfaced by [`super::CommentService`].
///
/// Cache and event failures never appear here; they are logged and absorbed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Comment(#[from] CommentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    OwnerLookup(#[from] OwnerLookupError),
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Comment(err) => comment_error_to_status_code(err),
            ServiceError::Repository(err) => repository_error_to_status_code(err),
            ServiceError::OwnerLookup(err) => owner_lookup_error_to_status_code(err),
        }
    }
}
