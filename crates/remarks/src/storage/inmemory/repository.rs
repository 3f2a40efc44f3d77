//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use remarks_core::comment::{Biz, BizCommentCount, Comment, CommentDraft};
use remarks_core::storage::{CommentRepository, CountStrategy, RepositoryError, Result};

/// Comment rows and counters behind a single lock, so every mutation is
/// atomic across both.
#[derive(Debug, Default)]
struct Tables {
    comments: BTreeMap<i64, Comment>,
    counts: HashMap<(Biz, i64), BizCommentCount>,
    last_id: i64,
}

/// In-memory storage backend for testing.
///
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
    count_strategy: CountStrategy,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(CountStrategy::default())
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new(count_strategy: CountStrategy) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            count_strategy,
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryRepository {
    async fn insert(&self, draft: &CommentDraft) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        tables.last_id += 1;
        let comment = draft.clone().into_comment(tables.last_id, now);
        tables.comments.insert(comment.id, comment.clone());

        tables
            .counts
            .entry((draft.biz, draft.biz_id))
            .and_modify(|count| {
                count.count += 1;
                count.updated_at = now;
            })
            .or_insert_with(|| BizCommentCount {
                biz: draft.biz,
                biz_id: draft.biz_id,
                count: 1,
                created_at: now,
                updated_at: now,
            });

        Ok(comment)
    }

    async fn delete(&self, comment_id: i64, requesting_uid: i64) -> Result<Comment> {
        let mut tables = self.tables.write().await;

        let Some(existing) = tables.comments.get(&comment_id) else {
            return Err(RepositoryError::comment_not_found(comment_id));
        };
        if existing.commentator_id != requesting_uid {
            return Err(RepositoryError::PermissionDenied {
                entity_type: "Comment",
                id: comment_id.to_string(),
                uid: requesting_uid,
            });
        }

        let comment = tables
            .comments
            .remove(&comment_id)
            .ok_or_else(|| RepositoryError::comment_not_found(comment_id))?;

        if let Some(count) = tables.counts.get_mut(&(comment.biz, comment.biz_id)) {
            count.count = (count.count - 1).max(0);
            count.updated_at = Utc::now();
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
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .range(..before_id)
            .map(|(_, c)| c)
            .filter(|c| c.biz == biz && c.biz_id == biz_id && c.is_top_level())
            .cloned()
            .collect();

        comments.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        comments.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(comments)
    }

    async fn find_replies_by_parent(
        &self,
        parent_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .rev()
            .filter(|c| c.parent_id == Some(parent_id))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn find_replies_by_root(
        &self,
        root_id: i64,
        after_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let start = after_id.saturating_add(1);
        Ok(tables
            .comments
            .range(start..)
            .map(|(_, c)| c)
            .filter(|c| c.root_id == Some(root_id))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count_by_object(&self, biz: Biz, biz_id: i64) -> Result<i64> {
        let tables = self.tables.read().await;
        let count = match self.count_strategy {
            CountStrategy::Materialized => tables
                .counts
                .get(&(biz, biz_id))
                .map(|c| c.count)
                .unwrap_or(0),
            CountStrategy::RowCount => tables
                .comments
                .values()
                .filter(|c| c.biz == biz && c.biz_id == biz_id)
                .count() as i64,
        };
        Ok(count)
    }

    async fn find_by_id(&self, comment_id: i64) -> Result<Comment> {
        let tables = self.tables.read().await;
        tables
            .comments
            .get(&comment_id)
            .cloned()
            .ok_or_else(|| RepositoryError::comment_not_found(comment_id))
    }
}
