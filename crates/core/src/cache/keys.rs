use crate::comment::Biz;

/// Returns the cache key holding the comment count of a business object.
pub fn biz_comment_count_key(biz: Biz, biz_id: i64) -> String {
    format!("comment:biz_count:{}:{}", biz.code(), biz_id)
}

/// Pub/sub channel carrying feed events.
pub const FEED_EVENTS_CHANNEL: &str = "feed:events";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biz_comment_count_key_format() {
        assert_eq!(
            biz_comment_count_key(Biz::Answer, 42),
            "comment:biz_count:2:42"
        );
        assert_eq!(
            biz_comment_count_key(Biz::Evaluation, 7),
            "comment:biz_count:1:7"
        );
    }

    #[test]
    fn test_keys_differ_per_object() {
        assert_ne!(
            biz_comment_count_key(Biz::Answer, 1),
            biz_comment_count_key(Biz::Question, 1)
        );
        assert_ne!(
            biz_comment_count_key(Biz::Answer, 1),
            biz_comment_count_key(Biz::Answer, 2)
        );
    }
}
