//! Assembly of the two-level preview tree at the read boundary.
//!
//! Comments stay flat records in storage; threads are rebuilt per page using an
//! id-indexed map over the page rather than pointers between comments.

use std::collections::HashMap;

use super::types::{Comment, CommentThread, PREVIEW_LIMIT};

/// Attaches reply previews to their top-level comments.
///
/// `previews` pairs a parent id with the replies fetched for it. Pairs whose
/// parent is not on the page are ignored, replies whose `parent_id` does not
/// match are dropped, and each thread keeps at most [`PREVIEW_LIMIT`] replies
/// in the order they were supplied. Top-level order is preserved.
pub fn attach_previews(
    roots: Vec<Comment>,
    previews: impl IntoIterator<Item = (i64, Vec<Comment>)>,
) -> Vec<CommentThread> {
    let index: HashMap<i64, usize> = roots
        .iter()
        .enumerate()
        .map(|(idx, comment)| (comment.id, idx))
        .collect();

    let mut threads: Vec<CommentThread> = roots.into_iter().map(CommentThread::bare).collect();

    for (parent_id, replies) in previews {
        let Some(&idx) = index.get(&parent_id) else {
            continue;
        };
        let thread = &mut threads[idx];
        for reply in replies {
            if thread.replies.len() >= PREVIEW_LIMIT {
                break;
            }
            if reply.parent_id == Some(parent_id) {
                thread.replies.push(reply);
            }
        }
    }

    threads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Biz;
    use chrono::Utc;

    fn comment(id: i64, parent_id: Option<i64>) -> Comment {
        let now = Utc::now();
        Comment {
            id,
            commentator_id: id * 10,
            biz: Biz::Answer,
            biz_id: 42,
            content: format!("comment {id}"),
            parent_id,
            root_id: parent_id,
            reply_to_uid: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_attach_preserves_root_order() {
        let roots = vec![comment(3, None), comment(2, None), comment(1, None)];
        let threads = attach_previews(roots, Vec::new());

        let ids: Vec<i64> = threads.iter().map(|t| t.comment.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(threads.iter().all(|t| t.replies.is_empty()));
    }

    #[test]
    fn test_attach_caps_previews() {
        let roots = vec![comment(1, None)];
        let replies: Vec<Comment> = (10..15).rev().map(|id| comment(id, Some(1))).collect();

        let threads = attach_previews(roots, vec![(1, replies)]);

        let ids: Vec<i64> = threads[0].replies.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![14, 13, 12]);
    }

    #[test]
    fn test_attach_ignores_foreign_parents_and_replies() {
        let roots = vec![comment(1, None), comment(2, None)];
        let previews = vec![
            (99, vec![comment(100, Some(99))]),
            (2, vec![comment(20, Some(2)), comment(21, Some(1))]),
        ];

        let threads = attach_previews(roots, previews);

        assert!(threads[0].replies.is_empty());
        let ids: Vec<i64> = threads[1].replies.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![20]);
    }

    #[test]
    fn test_attach_with_missing_preview_leaves_thread_bare() {
        let roots = vec![comment(1, None), comment(2, None)];
        let threads = attach_previews(roots, vec![(1, vec![comment(5, Some(1))])]);

        assert_eq!(threads[0].replies.len(), 1);
        assert!(threads[1].replies.is_empty());
    }
}
