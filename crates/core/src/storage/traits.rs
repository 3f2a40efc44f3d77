use async_trait::async_trait;

use crate::comment::{Biz, Comment, CommentDraft};

use super::Result;

/// Repository for comments and their per-object counters.
///
/// Mutations keep the comment row and the `(biz, biz_id)` counter in one
/// atomic unit: no reader may observe one without the other.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persists a comment and bumps its object's counter, returning the stored row.
    async fn insert(&self, draft: &CommentDraft) -> Result<Comment>;

    /// Deletes a comment authored by `requesting_uid` and decrements its object's counter.
    ///
    /// Fails with `PermissionDenied` (no mutation) when the caller is not the
    /// author and `NotFound` when nothing was deleted. Returns the deleted row.
    async fn delete(&self, comment_id: i64, requesting_uid: i64) -> Result<Comment>;

    /// Top-level comments of an object with `id < before_id`, most recently updated first.
    async fn find_top_level(
        &self,
        biz: Biz,
        biz_id: i64,
        before_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>>;

    /// Direct replies of a comment, newest id first, offset-paginated.
    async fn find_replies_by_parent(
        &self,
        parent_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>>;

    /// Every descendant of a root with `id > after_id`, oldest id first.
    async fn find_replies_by_root(
        &self,
        root_id: i64,
        after_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>>;

    /// Authoritative number of comments attached to an object.
    async fn count_by_object(&self, biz: Biz, biz_id: i64) -> Result<i64>;

    /// Gets a comment by id, failing with `NotFound` if absent.
    async fn find_by_id(&self, comment_id: i64) -> Result<Comment>;
}
