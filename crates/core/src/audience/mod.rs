//! Who a new comment is addressed to.
//!
//! Top-level comments address the owner of the commented object; replies
//! address the author of their parent.

mod registry;
mod resolve;

use async_trait::async_trait;
use thiserror::Error;

use crate::comment::Biz;

pub use registry::OwnerRegistry;
pub use resolve::{resolve_draft, Audience};

/// Errors returned by an owner lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OwnerLookupError {
    #[error("{biz} {biz_id} does not exist")]
    NotFound { biz: Biz, biz_id: i64 },
    #[error("Owner lookup unavailable: {0}")]
    Unavailable(String),
    #[error("Owner lookup returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Maps an [`OwnerLookupError`] to an HTTP status code.
pub fn owner_lookup_error_to_status_code(error: &OwnerLookupError) -> u16 {
    match error {
        OwnerLookupError::NotFound { .. } => 404,
        OwnerLookupError::Unavailable(_) => 502,
        OwnerLookupError::InvalidResponse(_) => 502,
    }
}

/// Resolves the owner of one kind of business object.
#[async_trait]
pub trait OwnerLookup: Send + Sync {
    async fn owner_of(&self, biz_id: i64) -> Result<i64, OwnerLookupError>;
}
