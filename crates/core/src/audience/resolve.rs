use crate::comment::{Comment, CommentDraft, CommentError, NewComment};

/// The people a new comment concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Audience {
    /// The user the comment is addressed to.
    pub reply_to_uid: i64,
    /// The owner of the commented object.
    pub biz_owner_uid: i64,
}

/// Resolves a comment request into a storable draft.
///
/// `parent` must be the stored parent when `comment.parent_id` is set. A reply
/// inherits the parent's object, is rooted at the parent's thread root and is
/// addressed to the parent's author. A top-level comment is addressed to the
/// object owner.
pub fn resolve_draft(
    comment: NewComment,
    parent: Option<&Comment>,
    biz_owner_uid: i64,
) -> Result<(CommentDraft, Audience), CommentError> {
    let (parent_id, root_id, reply_to_uid) = match parent {
        Some(parent) => {
            if parent.biz != comment.biz || parent.biz_id != comment.biz_id {
                return Err(CommentError::ParentMismatch {
                    expected_biz: parent.biz,
                    expected_biz_id: parent.biz_id,
                    biz: comment.biz,
                    biz_id: comment.biz_id,
                });
            }
            (
                Some(parent.id),
                Some(parent.thread_root()),
                parent.commentator_id,
            )
        }
        None => (None, None, biz_owner_uid),
    };

    let draft = CommentDraft {
        commentator_id: comment.commentator_id,
        biz: comment.biz,
        biz_id: comment.biz_id,
        content: comment.content,
        parent_id,
        root_id,
        reply_to_uid,
    };

    Ok((
        draft,
        Audience {
            reply_to_uid,
            biz_owner_uid,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Biz;
    use chrono::Utc;

    fn stored(id: i64, commentator_id: i64, parent_id: Option<i64>, root_id: Option<i64>) -> Comment {
        let now = Utc::now();
        Comment {
            id,
            commentator_id,
            biz: Biz::Answer,
            biz_id: 42,
            content: "parent".to_string(),
            parent_id,
            root_id,
            reply_to_uid: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_top_level_addresses_owner() {
        let request = NewComment::top_level(1, Biz::Answer, 42, "first");

        let (draft, audience) = resolve_draft(request, None, 99).unwrap();

        assert_eq!(draft.parent_id, None);
        assert_eq!(draft.root_id, None);
        assert_eq!(draft.reply_to_uid, 99);
        assert_eq!(audience.biz_owner_uid, 99);
    }

    #[test]
    fn test_reply_to_top_level_addresses_parent_author() {
        let parent = stored(10, 1, None, None);
        let request = NewComment::top_level(2, Biz::Answer, 42, "reply").replying_to(10);

        let (draft, audience) = resolve_draft(request, Some(&parent), 99).unwrap();

        assert_eq!(draft.parent_id, Some(10));
        assert_eq!(draft.root_id, Some(10));
        assert_eq!(draft.reply_to_uid, 1);
        assert_eq!(audience.reply_to_uid, 1);
        assert_eq!(audience.biz_owner_uid, 99);
    }

    #[test]
    fn test_nested_reply_is_rooted_at_top_level_ancestor() {
        let parent = stored(11, 3, Some(10), Some(10));
        let request = NewComment::top_level(4, Biz::Answer, 42, "deeper").replying_to(11);

        let (draft, _) = resolve_draft(request, Some(&parent), 99).unwrap();

        assert_eq!(draft.parent_id, Some(11));
        assert_eq!(draft.root_id, Some(10));
        assert_eq!(draft.reply_to_uid, 3);
    }

    #[test]
    fn test_reply_on_other_object_is_rejected() {
        let parent = stored(10, 1, None, None);
        let request = NewComment::top_level(2, Biz::Evaluation, 42, "wrong").replying_to(10);

        let result = resolve_draft(request, Some(&parent), 99);

        assert!(matches!(result, Err(CommentError::ParentMismatch { .. })));
    }
}
