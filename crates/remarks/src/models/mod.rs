mod comment;

pub use comment::{
    CountQuery, CountResponse, DegradedMode, DeleteCommentQuery, ListCommentsQuery,
    ListRepliesQuery,
};
