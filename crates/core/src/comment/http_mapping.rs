use super::CommentError;

/// Maps a [`CommentError`] to an HTTP status code.
///
/// Every variant describes a request the server refuses to act on, so all of
/// them map to 400 except unknown stored codes, which are a server fault.
pub fn comment_error_to_status_code(error: &CommentError) -> u16 {
    match error {
        CommentError::InvalidBiz(_) => 400,
        CommentError::EmptyContent => 400,
        CommentError::ContentTooLong { .. } => 400,
        CommentError::ParentMismatch { .. } => 400,
        CommentError::UnknownBizCode(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Biz;

    #[test]
    fn test_request_errors_map_to_400() {
        assert_eq!(
            comment_error_to_status_code(&CommentError::InvalidBiz(Biz::Question)),
            400
        );
        assert_eq!(comment_error_to_status_code(&CommentError::EmptyContent), 400);
    }

    #[test]
    fn test_unknown_code_maps_to_500() {
        assert_eq!(
            comment_error_to_status_code(&CommentError::UnknownBizCode(8)),
            500
        );
    }
}
