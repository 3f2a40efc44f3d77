//! Cached comment repository decorator.
//!
//! Wraps a `CommentRepository` with a count cache. Only `count_by_object`
//! reads through the cache; every other read goes straight to storage.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use remarks_core::cache::CountCache;
use remarks_core::comment::{Biz, Comment, CommentDraft};
use remarks_core::storage::{CommentRepository, Result};

use crate::tasks::BackgroundTasks;

/// Cached comment repository decorator.
///
/// - **Count reads**: check cache first; on a miss return the stored count and
///   backfill the cache from a detached task with its own deadline
/// - **Writes**: persist to storage, then adjust the cached count only if one
///   is already present
///
/// Cache failures never fail a call; storage stays authoritative.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The count cache implementation
pub struct CachedCommentRepository<R, C>
where
    R: CommentRepository,
    C: CountCache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    tasks: BackgroundTasks,
    ttl: Duration,
    backfill_timeout: Duration,
}

impl<R, C> CachedCommentRepository<R, C>
where
    R: CommentRepository,
    C: CountCache,
{
    /// Creates a new cached comment repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The count cache implementation
    /// * `tasks` - Spawner for miss-triggered backfills
    /// * `ttl` - Time-to-live for cached counts
    /// * `backfill_timeout` - Deadline of a single backfill
    pub fn new(
        repository: Arc<R>,
        cache: Arc<C>,
        tasks: BackgroundTasks,
        ttl: Duration,
        backfill_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            tasks,
            ttl,
            backfill_timeout,
        }
    }
}

#[async_trait]
impl<R, C> CommentRepository for CachedCommentRepository<R, C>
where
    R: CommentRepository + 'static,
    C: CountCache + 'static,
{
    async fn insert(&self, draft: &CommentDraft) -> Result<Comment> {
        let comment = self.repository.insert(draft).await?;

        match self.cache.increment_if_present(comment.biz, comment.biz_id).await {
            Ok(true) => {
                tracing::trace!(biz = %comment.biz, biz_id = comment.biz_id, "Cached count incremented")
            }
            Ok(false) => {}
            Err(err) => tracing::warn!(
                biz = %comment.biz,
                biz_id = comment.biz_id,
                error = %err,
                "Failed to increment cached count"
            ),
        }

        Ok(comment)
    }

    async fn delete(&self, comment_id: i64, requesting_uid: i64) -> Result<Comment> {
        let comment = self.repository.delete(comment_id, requesting_uid).await?;

        if let Err(err) = self
            .cache
            .decrement_if_present(comment.biz, comment.biz_id)
            .await
        {
            tracing::warn!(
                biz = %comment.biz,
                biz_id = comment.biz_id,
                error = %err,
                "Failed to decrement cached count"
            );
        }

        Ok(comment)
    }

    async fn find_top_level(
        &self,
        biz: Biz,
        biz_id: i64,
        before_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        self.repository
            .find_top_level(biz, biz_id, before_id, limit)
            .await
    }

    async fn find_replies_by_parent(
        &self,
        parent_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        self.repository
            .find_replies_by_parent(parent_id, offset, limit)
            .await
    }

    async fn find_replies_by_root(
        &self,
        root_id: i64,
        after_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        self.repository
            .find_replies_by_root(root_id, after_id, limit)
            .await
    }

    async fn count_by_object(&self, biz: Biz, biz_id: i64) -> Result<i64> {
        match self.cache.get_count(biz, biz_id).await {
            Ok(Some(count)) => {
                tracing::trace!(%biz, biz_id, count, "Cache hit for comment count");
                return Ok(count);
            }
            Ok(None) => tracing::trace!(%biz, biz_id, "Cache miss for comment count"),
            Err(err) => {
                // Cache unreachable: serve from storage without writing back
                tracing::warn!(%biz, biz_id, error = %err, "Count cache read failed");
                return self.repository.count_by_object(biz, biz_id).await;
            }
        }

        let count = self.repository.count_by_object(biz, biz_id).await?;

        let cache = self.cache.clone();
        let ttl = self.ttl;
        self.tasks
            .submit("count_backfill", self.backfill_timeout, async move {
                if let Err(err) = cache.set_count(biz, biz_id, count, ttl).await {
                    tracing::warn!(%biz, biz_id, error = %err, "Failed to backfill cached count");
                }
            });

        Ok(count)
    }

    async fn find_by_id(&self, comment_id: i64) -> Result<Comment> {
        self.repository.find_by_id(comment_id).await
    }
}
