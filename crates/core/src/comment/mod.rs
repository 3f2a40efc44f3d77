mod error;
mod http_mapping;
mod operations;
mod tree;
mod types;

pub use error::CommentError;
pub use http_mapping::comment_error_to_status_code;
pub use operations::{
    clamp_limit, reply_cursor, top_level_cursor, validate_new_comment, DEFAULT_PAGE_SIZE,
    MAX_CONTENT_CHARS,
};
pub use tree::attach_previews;
pub use types::{
    Biz, BizCommentCount, Comment, CommentDraft, CommentThread, NewComment, PREVIEW_LIMIT,
};
