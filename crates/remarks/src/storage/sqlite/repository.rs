//! SQLite repository implementation.
//!
//! Implements `CommentRepository` from `remarks_core::storage` using SQLite.
//! Every mutation touches the comment row and its counter inside one
//! transaction.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use remarks_core::comment::{Biz, Comment, CommentDraft};
use remarks_core::storage::{CommentRepository, CountStrategy, RepositoryError, Result};

use super::conversions::{now, row_to_comment, to_millis};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

const ENTITY: &str = "Comment";

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// What happened inside a delete transaction.
enum DeleteOutcome {
    Deleted(Comment),
    Missing,
    NotAuthor,
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
    count_strategy: CountStrategy,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str, count_strategy: CountStrategy) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self {
            conn,
            count_strategy,
        })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory(count_strategy: CountStrategy) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self {
            conn,
            count_strategy,
        })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn query_comments(
        &self,
        sql: String,
        params: [i64; 3],
    ) -> Result<Vec<Comment>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params, row_to_comment)
                    .map_err(wrap_err)?;

                let mut comments = Vec::new();
                for row_result in rows {
                    comments.push(row_result.map_err(wrap_err)?);
                }
                Ok(comments)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }
}

#[async_trait]
impl CommentRepository for SqliteRepository {
    async fn insert(&self, draft: &CommentDraft) -> Result<Comment> {
        let draft = draft.clone();
        let created_at = now();
        let ts = to_millis(&created_at);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_COMMENT,
                    rusqlite::params![
                        draft.commentator_id,
                        draft.biz.code(),
                        draft.biz_id,
                        draft.content,
                        draft.parent_id,
                        draft.root_id,
                        draft.reply_to_uid,
                        ts
                    ],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                tx.execute(
                    schema::INCREMENT_COUNT,
                    rusqlite::params![draft.biz.code(), draft.biz_id, ts],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;

                Ok(draft.into_comment(id, created_at))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }

    async fn delete(&self, comment_id: i64, requesting_uid: i64) -> Result<Comment> {
        let ts = to_millis(&now());

        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let comment = match tx.query_row(
                    &schema::select_comment_by_id(),
                    [comment_id],
                    row_to_comment,
                ) {
                    Ok(comment) => comment,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(DeleteOutcome::Missing),
                    Err(e) => return Err(wrap_err(e)),
                };

                // Dropping the transaction rolls back; nothing has been written yet.
                if comment.commentator_id != requesting_uid {
                    return Ok(DeleteOutcome::NotAuthor);
                }

                let rows = tx
                    .execute(
                        schema::DELETE_COMMENT_BY_AUTHOR,
                        rusqlite::params![comment_id, requesting_uid],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Ok(DeleteOutcome::Missing);
                }

                tx.execute(
                    schema::DECREMENT_COUNT,
                    rusqlite::params![comment.biz.code(), comment.biz_id, ts],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;

                Ok(DeleteOutcome::Deleted(comment))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, comment_id.to_string()))?;

        match outcome {
            DeleteOutcome::Deleted(comment) => Ok(comment),
            DeleteOutcome::Missing => Err(RepositoryError::comment_not_found(comment_id)),
            DeleteOutcome::NotAuthor => Err(RepositoryError::PermissionDenied {
                entity_type: ENTITY,
                id: comment_id.to_string(),
                uid: requesting_uid,
            }),
        }
    }

    async fn find_top_level(
        &self,
        biz: Biz,
        biz_id: i64,
        before_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        let biz_code = i64::from(biz.code());
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&schema::select_top_level()).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([biz_code, biz_id, before_id, limit], row_to_comment)
                    .map_err(wrap_err)?;

                let mut comments = Vec::new();
                for row_result in rows {
                    comments.push(row_result.map_err(wrap_err)?);
                }
                Ok(comments)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ENTITY))
    }

    async fn find_replies_by_parent(
        &self,
        parent_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        self.query_comments(
            schema::select_replies_by_parent(),
            [parent_id, offset, limit],
        )
        .await
    }

    async fn find_replies_by_root(
        &self,
        root_id: i64,
        after_id: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        self.query_comments(schema::select_replies_by_root(), [root_id, after_id, limit])
            .await
    }

    async fn count_by_object(&self, biz: Biz, biz_id: i64) -> Result<i64> {
        let biz_code = biz.code();
        let strategy = self.count_strategy;

        self.conn
            .call(move |conn| {
                let sql = match strategy {
                    CountStrategy::Materialized => schema::SELECT_COUNT,
                    CountStrategy::RowCount => schema::COUNT_COMMENTS_BY_OBJECT,
                };
                match conn.query_row(sql, rusqlite::params![biz_code, biz_id], |row| {
                    row.get::<_, i64>(0)
                }) {
                    Ok(count) => Ok(count),
                    // No counter row yet means no comment was ever created.
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "BizCommentCount"))
    }

    async fn find_by_id(&self, comment_id: i64) -> Result<Comment> {
        self.conn
            .call(move |conn| {
                conn.query_row(&schema::select_comment_by_id(), [comment_id], row_to_comment)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, comment_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory(CountStrategy::Materialized)
            .await
            .unwrap()
    }

    fn top_level(commentator_id: i64, biz_id: i64) -> CommentDraft {
        CommentDraft {
            commentator_id,
            biz: Biz::Answer,
            biz_id,
            content: format!("from {commentator_id}"),
            parent_id: None,
            root_id: None,
            reply_to_uid: 100,
        }
    }

    fn reply(commentator_id: i64, parent: &Comment) -> CommentDraft {
        CommentDraft {
            commentator_id,
            biz: parent.biz,
            biz_id: parent.biz_id,
            content: "reply".to_string(),
            parent_id: Some(parent.id),
            root_id: Some(parent.thread_root()),
            reply_to_uid: parent.commentator_id,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids_and_counts() {
        let repo = repo().await;

        let first = repo.insert(&top_level(1, 42)).await.unwrap();
        let second = repo.insert(&top_level(2, 42)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(repo.count_by_object(Biz::Answer, 42).await.unwrap(), 2);
        assert_eq!(repo.count_by_object(Biz::Answer, 43).await.unwrap(), 0);
        assert_eq!(repo.find_by_id(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_delete_by_author_decrements_count() {
        let repo = repo().await;
        let c1 = repo.insert(&top_level(1, 42)).await.unwrap();
        let c2 = repo.insert(&reply(2, &c1)).await.unwrap();
        assert_eq!(repo.count_by_object(Biz::Answer, 42).await.unwrap(), 2);

        let deleted = repo.delete(c1.id, 1).await.unwrap();

        assert_eq!(deleted.id, c1.id);
        assert_eq!(repo.count_by_object(Biz::Answer, 42).await.unwrap(), 1);
        // Replies survive their parent.
        assert_eq!(repo.find_by_id(c2.id).await.unwrap(), c2);
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_denied_without_mutation() {
        let repo = repo().await;
        let c1 = repo.insert(&top_level(1, 42)).await.unwrap();

        let result = repo.delete(c1.id, 2).await;

        assert!(matches!(
            result,
            Err(RepositoryError::PermissionDenied { uid: 2, .. })
        ));
        assert_eq!(repo.count_by_object(Biz::Answer, 42).await.unwrap(), 1);
        assert!(repo.find_by_id(c1.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = repo().await;

        let result = repo.delete(999, 1).await;

        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_find_top_level_keyset_pagination() {
        let repo = repo().await;
        let mut ids = Vec::new();
        for uid in 1..=5 {
            ids.push(repo.insert(&top_level(uid, 42)).await.unwrap().id);
        }
        let parent = repo.find_by_id(ids[0]).await.unwrap();
        repo.insert(&reply(9, &parent)).await.unwrap();

        let page = repo.find_top_level(Biz::Answer, 42, i64::MAX, 3).await.unwrap();
        assert_eq!(page.len(), 3);
        assert!(page.iter().all(Comment::is_top_level));

        let cursor = page.iter().map(|c| c.id).min().unwrap();
        let next = repo.find_top_level(Biz::Answer, 42, cursor, 3).await.unwrap();
        assert!(next.iter().all(|c| c.id < cursor));
        assert_eq!(page.len() + next.len(), 5);
    }

    #[tokio::test]
    async fn test_replies_by_parent_newest_first_with_offset() {
        let repo = repo().await;
        let root = repo.insert(&top_level(1, 42)).await.unwrap();
        let mut reply_ids = Vec::new();
        for uid in 2..=6 {
            reply_ids.push(repo.insert(&reply(uid, &root)).await.unwrap().id);
        }

        let first = repo.find_replies_by_parent(root.id, 0, 3).await.unwrap();
        let ids: Vec<i64> = first.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![reply_ids[4], reply_ids[3], reply_ids[2]]);

        let rest = repo.find_replies_by_parent(root.id, 3, 3).await.unwrap();
        assert_eq!(rest.len(), 2);
    }

    #[tokio::test]
    async fn test_replies_by_root_flattens_descendants_oldest_first() {
        let repo = repo().await;
        let root = repo.insert(&top_level(1, 42)).await.unwrap();
        let r1 = repo.insert(&reply(2, &root)).await.unwrap();
        let r2 = repo.insert(&reply(3, &r1)).await.unwrap();
        let r3 = repo.insert(&reply(4, &root)).await.unwrap();

        let all = repo.find_replies_by_root(root.id, 0, 10).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![r1.id, r2.id, r3.id]);
        assert_eq!(r2.root_id, Some(root.id));

        let after = repo.find_replies_by_root(root.id, r1.id, 10).await.unwrap();
        assert_eq!(after.len(), 2);
        assert!(after.iter().all(|c| c.id > r1.id));
    }

    #[tokio::test]
    async fn test_row_count_strategy_counts_rows() {
        let repo = SqliteRepository::new_in_memory(CountStrategy::RowCount)
            .await
            .unwrap();
        let c1 = repo.insert(&top_level(1, 7)).await.unwrap();
        repo.insert(&reply(2, &c1)).await.unwrap();

        assert_eq!(repo.count_by_object(Biz::Answer, 7).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let repo = repo().await;

        let result = repo.find_by_id(5).await;

        match result {
            Err(RepositoryError::NotFound { id, .. }) => assert_eq!(id, "5"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }
}
