use serde::{Deserialize, Serialize};

use remarks_core::comment::Biz;

/// Query parameters for listing top-level comments.
///
/// A missing or non-positive `cursor` starts from the newest comment; a
/// missing or non-positive `limit` uses the default page size.
#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    pub biz: Biz,
    pub biz_id: i64,
    #[serde(default)]
    pub cursor: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Query parameters for the flat reply stream of one thread.
#[derive(Debug, Default, Deserialize)]
pub struct ListRepliesQuery {
    #[serde(default)]
    pub cursor: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Query parameters identifying who asks for a delete.
#[derive(Debug, Deserialize)]
pub struct DeleteCommentQuery {
    pub uid: i64,
}

/// Query parameters for reading a comment count.
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub biz: Biz,
    pub biz_id: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountResponse {
    pub biz: Biz,
    pub biz_id: i64,
    pub count: i64,
}

/// Degraded-mode switch, read and written as `{"enabled": bool}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DegradedMode {
    pub enabled: bool,
}
