use thiserror::Error;

use super::types::Biz;

/// Errors that can occur when validating or resolving a new comment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommentError {
    #[error("Business type is not registered: {0}")]
    InvalidBiz(Biz),
    #[error("Unknown business type code: {0}")]
    UnknownBizCode(i32),
    #[error("Comment content cannot be empty")]
    EmptyContent,
    #[error("Comment content too long (max {max} characters)")]
    ContentTooLong { max: usize },
    #[error("Reply targets {expected_biz}:{expected_biz_id} but was submitted for {biz}:{biz_id}")]
    ParentMismatch {
        expected_biz: Biz,
        expected_biz_id: i64,
        biz: Biz,
        biz_id: i64,
    },
}
