use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CommentError;

/// Maximum number of reply previews attached to a top-level comment in list views.
pub const PREVIEW_LIMIT: usize = 3;

/// The kind of business object a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biz {
    Evaluation,
    Answer,
    Question,
}

impl Biz {
    /// All known business types.
    pub const ALL: [Biz; 3] = [Biz::Evaluation, Biz::Answer, Biz::Question];

    /// Returns the integer code used in storage and cache keys.
    pub fn code(self) -> i32 {
        match self {
            Biz::Evaluation => 1,
            Biz::Answer => 2,
            Biz::Question => 3,
        }
    }

    /// Parses a storage code back into a business type.
    pub fn from_code(code: i32) -> Result<Self, CommentError> {
        match code {
            1 => Ok(Biz::Evaluation),
            2 => Ok(Biz::Answer),
            3 => Ok(Biz::Question),
            other => Err(CommentError::UnknownBizCode(other)),
        }
    }

    /// Returns the snake_case name used on the wire and in event metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            Biz::Evaluation => "evaluation",
            Biz::Answer => "answer",
            Biz::Question => "question",
        }
    }
}

impl fmt::Display for Biz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted comment.
///
/// Comments are flat records addressed by id. `parent_id` is `None` for
/// top-level comments; for replies `root_id` always points at the top-level
/// ancestor, never at an intermediate one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub commentator_id: i64,
    pub biz: Biz,
    pub biz_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
    pub root_id: Option<i64>,
    pub reply_to_uid: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Returns true if this comment has no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns the id of the thread this comment belongs to.
    ///
    /// Top-level comments anchor their own thread.
    pub fn thread_root(&self) -> i64 {
        match self.parent_id {
            None => self.id,
            Some(_) => self.root_id.unwrap_or(self.id),
        }
    }
}

/// A comment as submitted by a client, before server-side resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub commentator_id: i64,
    pub biz: Biz,
    pub biz_id: i64,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl NewComment {
    /// Creates a new top-level comment request.
    pub fn top_level(commentator_id: i64, biz: Biz, biz_id: i64, content: impl Into<String>) -> Self {
        Self {
            commentator_id,
            biz,
            biz_id,
            content: content.into(),
            parent_id: None,
        }
    }

    /// Turns this request into a reply to `parent_id`.
    pub fn replying_to(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Reads a parent id of `0` as "no parent".
    ///
    /// Clients that always send the field use `0` for top-level comments.
    pub fn normalized(mut self) -> Self {
        if self.parent_id == Some(0) {
            self.parent_id = None;
        }
        self
    }
}

/// A comment row ready to be written: identities resolved, id not yet assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub commentator_id: i64,
    pub biz: Biz,
    pub biz_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
    pub root_id: Option<i64>,
    pub reply_to_uid: i64,
}

impl CommentDraft {
    /// Materialises the draft into a comment with the storage-assigned id and timestamp.
    pub fn into_comment(self, id: i64, now: DateTime<Utc>) -> Comment {
        Comment {
            id,
            commentator_id: self.commentator_id,
            biz: self.biz,
            biz_id: self.biz_id,
            content: self.content,
            parent_id: self.parent_id,
            root_id: self.root_id,
            reply_to_uid: self.reply_to_uid,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The running comment count for one business object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BizCommentCount {
    pub biz: Biz,
    pub biz_id: i64,
    pub count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A top-level comment with a bounded preview of its direct replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

impl CommentThread {
    /// Creates a thread with no previews.
    pub fn bare(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }
}
