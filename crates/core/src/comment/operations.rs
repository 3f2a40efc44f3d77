use super::error::CommentError;
use super::types::NewComment;

/// Maximum accepted comment length, in characters.
pub const MAX_CONTENT_CHARS: usize = 4096;

/// Page size used when a caller passes a non-positive limit.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Validates a comment request before any resolution or write happens.
pub fn validate_new_comment(comment: &NewComment) -> Result<(), CommentError> {
    if comment.content.trim().is_empty() {
        return Err(CommentError::EmptyContent);
    }
    if comment.content.chars().count() > MAX_CONTENT_CHARS {
        return Err(CommentError::ContentTooLong {
            max: MAX_CONTENT_CHARS,
        });
    }
    Ok(())
}

/// Maps a top-level list cursor to the exclusive upper id bound.
///
/// A non-positive cursor means "first page", which is every id below `i64::MAX`.
pub fn top_level_cursor(cursor_id: i64) -> i64 {
    if cursor_id <= 0 {
        i64::MAX
    } else {
        cursor_id
    }
}

/// Maps a reply-stream cursor to the exclusive lower id bound.
pub fn reply_cursor(cursor_id: i64) -> i64 {
    cursor_id.max(0)
}

/// Normalises a requested page size into `1..=max`.
pub fn clamp_limit(limit: i64, max: i64) -> i64 {
    let max = max.max(1);
    if limit <= 0 {
        DEFAULT_PAGE_SIZE.min(max)
    } else {
        limit.min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Biz;

    #[test]
    fn test_validate_accepts_regular_content() {
        let comment = NewComment::top_level(1, Biz::Answer, 42, "nice answer");
        assert_eq!(validate_new_comment(&comment), Ok(()));
    }

    #[test]
    fn test_validate_rejects_blank_content() {
        let comment = NewComment::top_level(1, Biz::Answer, 42, "   \n");
        assert_eq!(validate_new_comment(&comment), Err(CommentError::EmptyContent));
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        let at_limit = "评".repeat(MAX_CONTENT_CHARS);
        let comment = NewComment::top_level(1, Biz::Answer, 42, at_limit);
        assert_eq!(validate_new_comment(&comment), Ok(()));

        let over = "a".repeat(MAX_CONTENT_CHARS + 1);
        let comment = NewComment::top_level(1, Biz::Answer, 42, over);
        assert_eq!(
            validate_new_comment(&comment),
            Err(CommentError::ContentTooLong {
                max: MAX_CONTENT_CHARS
            })
        );
    }

    #[test]
    fn test_top_level_cursor_first_page() {
        assert_eq!(top_level_cursor(0), i64::MAX);
        assert_eq!(top_level_cursor(-5), i64::MAX);
        assert_eq!(top_level_cursor(17), 17);
    }

    #[test]
    fn test_reply_cursor_never_negative() {
        assert_eq!(reply_cursor(-1), 0);
        assert_eq!(reply_cursor(0), 0);
        assert_eq!(reply_cursor(9), 9);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0, 50), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(-3, 50), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(5, 50), 5);
        assert_eq!(clamp_limit(500, 50), 50);
        assert_eq!(clamp_limit(0, 4), 4);
    }
}
