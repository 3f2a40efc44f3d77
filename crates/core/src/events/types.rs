use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::comment::Comment;

/// The kind of feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedEventKind {
    Comment,
}

/// A notification handed to the downstream feed consumer.
///
/// Metadata is a string map so the consumer does not depend on comment types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub kind: FeedEventKind,
    pub metadata: BTreeMap<String, String>,
}

impl FeedEvent {
    /// Builds the event announcing a newly created comment.
    ///
    /// `biz_owner_uid` is the owner of the commented object, which may differ
    /// from the comment's recipient when the comment is a reply.
    pub fn comment_created(comment: &Comment, biz_owner_uid: i64) -> Self {
        let metadata = BTreeMap::from([
            (
                "commentator".to_string(),
                comment.commentator_id.to_string(),
            ),
            ("recipient".to_string(), comment.reply_to_uid.to_string()),
            ("bizPublisher".to_string(), biz_owner_uid.to_string()),
            ("biz".to_string(), comment.biz.as_str().to_string()),
            ("bizId".to_string(), comment.biz_id.to_string()),
            ("commentId".to_string(), comment.id.to_string()),
        ]);

        Self {
            kind: FeedEventKind::Comment,
            metadata,
        }
    }

    /// Returns a metadata value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
