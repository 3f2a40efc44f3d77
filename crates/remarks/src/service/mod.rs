//! Comment use cases: create, delete, list, count.
//!
//! The service sequences the functional core (validation, audience
//! resolution, tree assembly) around the repository and the external
//! collaborators. Storage errors propagate; owner lookups are part of the
//! synchronous path; feed events are fire-and-forget.

mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use remarks_core::audience::{resolve_draft, OwnerRegistry};
use remarks_core::comment::{
    attach_previews, clamp_limit, reply_cursor, top_level_cursor, validate_new_comment, Biz,
    Comment, CommentThread, NewComment, PREVIEW_LIMIT,
};
use remarks_core::events::{EventProducer, FeedEvent};
use remarks_core::storage::CommentRepository;

use crate::tasks::BackgroundTasks;

pub use error::ServiceError;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Tunables fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    /// Largest page any list operation returns; also bounds preview fan-out.
    pub max_page_size: i64,
    /// Deadline of a single feed event emission.
    pub event_timeout: Duration,
    /// Initial degraded-mode state.
    pub degraded: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            max_page_size: 50,
            event_timeout: Duration::from_secs(2),
            degraded: false,
        }
    }
}

/// Comment operations over a repository, owner lookups and a feed producer.
pub struct CommentService {
    repository: Arc<dyn CommentRepository>,
    owners: OwnerRegistry,
    events: Arc<dyn EventProducer>,
    tasks: BackgroundTasks,
    max_page_size: i64,
    event_timeout: Duration,
    degraded: AtomicBool,
}

impl CommentService {
    pub fn new(
        repository: Arc<dyn CommentRepository>,
        owners: OwnerRegistry,
        events: Arc<dyn EventProducer>,
        tasks: BackgroundTasks,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            repository,
            owners,
            events,
            tasks,
            max_page_size: settings.max_page_size.max(1),
            event_timeout: settings.event_timeout,
            degraded: AtomicBool::new(settings.degraded),
        }
    }

    /// Returns true while list views skip reply previews.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Turns degraded mode on or off.
    pub fn set_degraded(&self, degraded: bool) {
        let previous = self.degraded.swap(degraded, Ordering::Relaxed);
        if previous != degraded {
            tracing::warn!(degraded, "Degraded mode changed");
        }
    }

    /// Creates a comment and returns it as stored.
    ///
    /// Validation and the business-type check happen before any lookup or
    /// write. A reply's parent must exist and belong to the same object.
    pub async fn create(&self, request: NewComment) -> Result<Comment> {
        let request = request.normalized();
        validate_new_comment(&request)?;
        let lookup = self.owners.get(request.biz)?;

        let parent = match request.parent_id {
            Some(parent_id) => Some(self.repository.find_by_id(parent_id).await?),
            None => None,
        };
        let biz_owner_uid = lookup.owner_of(request.biz_id).await?;
        let (draft, audience) = resolve_draft(request, parent.as_ref(), biz_owner_uid)?;

        let comment = self.repository.insert(&draft).await?;
        tracing::info!(
            comment_id = comment.id,
            biz = %comment.biz,
            biz_id = comment.biz_id,
            reply_to_uid = comment.reply_to_uid,
            "Comment created"
        );

        self.emit_created(&comment, audience.biz_owner_uid);
        Ok(comment)
    }

    /// Deletes a comment on behalf of its author.
    pub async fn delete(&self, comment_id: i64, requesting_uid: i64) -> Result<()> {
        let comment = self.repository.delete(comment_id, requesting_uid).await?;
        tracing::info!(
            comment_id,
            biz = %comment.biz,
            biz_id = comment.biz_id,
            "Comment deleted"
        );
        Ok(())
    }

    /// Gets a single comment.
    pub async fn get(&self, comment_id: i64) -> Result<Comment> {
        Ok(self.repository.find_by_id(comment_id).await?)
    }

    /// Lists top-level comments newest first, each with up to
    /// [`PREVIEW_LIMIT`] reply previews.
    ///
    /// A failed preview lookup leaves that comment without previews; it never
    /// fails the page.
    pub async fn list_top_level(
        &self,
        biz: Biz,
        biz_id: i64,
        cursor_id: i64,
        limit: i64,
    ) -> Result<Vec<CommentThread>> {
        let before_id = top_level_cursor(cursor_id);
        let limit = clamp_limit(limit, self.max_page_size);

        let roots = self
            .repository
            .find_top_level(biz, biz_id, before_id, limit)
            .await?;

        if self.is_degraded() {
            tracing::debug!(%biz, biz_id, "Degraded mode, skipping reply previews");
            return Ok(roots.into_iter().map(CommentThread::bare).collect());
        }

        let lookups = roots.iter().map(|root| self.preview(root.id));
        let previews = join_all(lookups).await;

        Ok(attach_previews(roots, previews))
    }

    /// Lists every reply under a root, oldest first, after `cursor_id`.
    pub async fn list_replies(&self, root_id: i64, cursor_id: i64, limit: i64) -> Result<Vec<Comment>> {
        let after_id = reply_cursor(cursor_id);
        let limit = clamp_limit(limit, self.max_page_size);

        Ok(self
            .repository
            .find_replies_by_root(root_id, after_id, limit)
            .await?)
    }

    /// Number of comments attached to an object.
    pub async fn count(&self, biz: Biz, biz_id: i64) -> Result<i64> {
        Ok(self.repository.count_by_object(biz, biz_id).await?)
    }

    async fn preview(&self, parent_id: i64) -> (i64, Vec<Comment>) {
        match self
            .repository
            .find_replies_by_parent(parent_id, 0, PREVIEW_LIMIT as i64)
            .await
        {
            Ok(replies) => (parent_id, replies),
            Err(err) => {
                tracing::warn!(comment_id = parent_id, error = %err, "Reply preview lookup failed");
                (parent_id, Vec::new())
            }
        }
    }

    fn emit_created(&self, comment: &Comment, biz_owner_uid: i64) {
        let event = FeedEvent::comment_created(comment, biz_owner_uid);
        let events = self.events.clone();
        let comment_id = comment.id;

        self.tasks
            .submit("feed_event", self.event_timeout, async move {
                if let Err(err) = events.produce(&event).await {
                    tracing::error!(comment_id, error = %err, "Failed to produce feed event");
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use async_trait::async_trait;
    use remarks_core::comment::{CommentDraft, CommentError};
    use remarks_core::storage::{RepositoryError, Result as RepoResult};

    use crate::cache::memory::MemoryEventBus;
    use crate::owners::StaticOwnerLookup;
    use crate::storage::inmemory::InMemoryRepository;

    const OWNER: i64 = 900;

    // Repository whose preview lookups fail for selected parents
    struct FlakyPreviews {
        inner: InMemoryRepository,
        failing_parents: std::sync::RwLock<HashSet<i64>>,
    }

    impl FlakyPreviews {
        fn new() -> Self {
            Self {
                inner: InMemoryRepository::default(),
                failing_parents: std::sync::RwLock::new(HashSet::new()),
            }
        }

        fn fail_previews_of(&self, parent_id: i64) {
            self.failing_parents.write().unwrap().insert(parent_id);
        }
    }

    #[async_trait]
    impl CommentRepository for FlakyPreviews {
        async fn insert(&self, draft: &CommentDraft) -> RepoResult<Comment> {
            self.inner.insert(draft).await
        }

        async fn delete(&self, comment_id: i64, requesting_uid: i64) -> RepoResult<Comment> {
            self.inner.delete(comment_id, requesting_uid).await
        }

        async fn find_top_level(
            &self,
            biz: Biz,
            biz_id: i64,
            before_id: i64,
            limit: i64,
        ) -> RepoResult<Vec<Comment>> {
            self.inner.find_top_level(biz, biz_id, before_id, limit).await
        }

        async fn find_replies_by_parent(
            &self,
            parent_id: i64,
            offset: i64,
            limit: i64,
        ) -> RepoResult<Vec<Comment>> {
            if self.failing_parents.read().unwrap().contains(&parent_id) {
                return Err(RepositoryError::QueryFailed("injected".to_string()));
            }
            self.inner
                .find_replies_by_parent(parent_id, offset, limit)
                .await
        }

        async fn find_replies_by_root(
            &self,
            root_id: i64,
            after_id: i64,
            limit: i64,
        ) -> RepoResult<Vec<Comment>> {
            self.inner.find_replies_by_root(root_id, after_id, limit).await
        }

        async fn count_by_object(&self, biz: Biz, biz_id: i64) -> RepoResult<i64> {
            self.inner.count_by_object(biz, biz_id).await
        }

        async fn find_by_id(&self, comment_id: i64) -> RepoResult<Comment> {
            self.inner.find_by_id(comment_id).await
        }
    }

    struct Fixture {
        service: CommentService,
        repository: Arc<FlakyPreviews>,
        events: Arc<MemoryEventBus>,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(FlakyPreviews::new());
        let events = Arc::new(MemoryEventBus::new());
        let owners = OwnerRegistry::new().with(
            Biz::Answer,
            Arc::new(StaticOwnerLookup::new(Biz::Answer).with_owner(42, OWNER)),
        );
        let service = CommentService::new(
            repository.clone(),
            owners,
            events.clone(),
            BackgroundTasks::new(16),
            ServiceSettings::default(),
        );
        Fixture {
            service,
            repository,
            events,
        }
    }

    fn top_level(uid: i64) -> NewComment {
        NewComment::top_level(uid, Biz::Answer, 42, format!("comment by {uid}"))
    }

    #[tokio::test]
    async fn test_create_reply_and_delete_scenario() {
        let f = fixture();

        let c1 = f.service.create(top_level(1)).await.unwrap();
        assert_eq!(c1.reply_to_uid, OWNER);
        assert_eq!(f.service.count(Biz::Answer, 42).await.unwrap(), 1);

        let c2 = f
            .service
            .create(top_level(2).replying_to(c1.id))
            .await
            .unwrap();
        assert_eq!(c2.reply_to_uid, 1);
        assert_eq!(c2.root_id, Some(c1.id));
        assert_eq!(f.service.count(Biz::Answer, 42).await.unwrap(), 2);

        f.service.delete(c1.id, 1).await.unwrap();
        assert_eq!(f.service.count(Biz::Answer, 42).await.unwrap(), 1);

        let page = f.service.list_top_level(Biz::Answer, 42, 0, 10).await.unwrap();
        assert!(page.iter().all(|t| t.comment.id != c1.id));
    }

    #[tokio::test]
    async fn test_fan_out_isolates_preview_failure() {
        let f = fixture();
        let mut roots = Vec::new();
        for uid in 1..=5 {
            let root = f.service.create(top_level(uid)).await.unwrap();
            for reply_uid in 10..15 {
                f.service
                    .create(top_level(reply_uid).replying_to(root.id))
                    .await
                    .unwrap();
            }
            roots.push(root);
        }
        f.repository.fail_previews_of(roots[2].id);

        let page = f.service.list_top_level(Biz::Answer, 42, 0, 5).await.unwrap();

        assert_eq!(page.len(), 5);
        for thread in &page {
            assert!(thread.comment.is_top_level());
            if thread.comment.id == roots[2].id {
                assert!(thread.replies.is_empty());
            } else {
                assert_eq!(thread.replies.len(), PREVIEW_LIMIT);
                assert!(thread
                    .replies
                    .iter()
                    .all(|r| r.parent_id == Some(thread.comment.id)));
            }
        }
    }

    #[tokio::test]
    async fn test_degraded_mode_skips_previews() {
        let f = fixture();
        let root = f.service.create(top_level(1)).await.unwrap();
        f.service
            .create(top_level(2).replying_to(root.id))
            .await
            .unwrap();

        f.service.set_degraded(true);
        let page = f.service.list_top_level(Biz::Answer, 42, 0, 10).await.unwrap();

        assert!(f.service.is_degraded());
        assert_eq!(page.len(), 1);
        assert!(page[0].replies.is_empty());
    }

    #[tokio::test]
    async fn test_list_top_level_pages_by_cursor() {
        let f = fixture();
        for uid in 1..=4 {
            f.service.create(top_level(uid)).await.unwrap();
        }

        let first = f.service.list_top_level(Biz::Answer, 42, -1, 2).await.unwrap();
        assert_eq!(first.len(), 2);

        let cursor = first.iter().map(|t| t.comment.id).min().unwrap();
        let second = f
            .service
            .list_top_level(Biz::Answer, 42, cursor, 2)
            .await
            .unwrap();
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|t| t.comment.id < cursor));
    }

    #[tokio::test]
    async fn test_list_replies_is_flat_and_oldest_first() {
        let f = fixture();
        let root = f.service.create(top_level(1)).await.unwrap();
        let r1 = f
            .service
            .create(top_level(2).replying_to(root.id))
            .await
            .unwrap();
        let r2 = f
            .service
            .create(top_level(3).replying_to(r1.id))
            .await
            .unwrap();
        assert_eq!(r2.root_id, Some(root.id));
        assert_eq!(r2.reply_to_uid, 2);

        let replies = f.service.list_replies(root.id, -5, 0).await.unwrap();
        let ids: Vec<i64> = replies.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![r1.id, r2.id]);

        let rest = f.service.list_replies(root.id, r1.id, 10).await.unwrap();
        assert_eq!(rest.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_parent_creates_top_level_comment() {
        let f = fixture();

        let comment = f.service.create(top_level(1).replying_to(0)).await.unwrap();

        assert!(comment.is_top_level());
        assert_eq!(comment.root_id, None);
        assert_eq!(comment.reply_to_uid, OWNER);
        let page = f.service.list_top_level(Biz::Answer, 42, 0, 10).await.unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_biz_fails_before_write() {
        let f = fixture();

        let result = f
            .service
            .create(NewComment::top_level(1, Biz::Question, 42, "hi"))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Comment(CommentError::InvalidBiz(Biz::Question)))
        ));
        assert_eq!(f.service.count(Biz::Question, 42).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reply_to_missing_parent_is_not_found() {
        let f = fixture();

        let result = f.service.create(top_level(1).replying_to(404)).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repository(ref e)) if e.is_not_found()
        ));
        assert_eq!(f.service.count(Biz::Answer, 42).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_content_is_rejected() {
        let f = fixture();

        let result = f
            .service
            .create(NewComment::top_level(1, Biz::Answer, 42, "  "))
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Comment(CommentError::EmptyContent))
        ));
    }

    #[tokio::test]
    async fn test_unknown_object_owner_fails_create() {
        let f = fixture();

        let result = f
            .service
            .create(NewComment::top_level(1, Biz::Answer, 43, "hi"))
            .await;

        assert!(matches!(result, Err(ServiceError::OwnerLookup(_))));
        assert_eq!(f.service.count(Biz::Answer, 43).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_non_author_is_denied() {
        let f = fixture();
        let c1 = f.service.create(top_level(1)).await.unwrap();

        let result = f.service.delete(c1.id, 2).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::PermissionDenied { .. }))
        ));
        assert_eq!(f.service.get(c1.id).await.unwrap(), c1);
    }

    #[tokio::test]
    async fn test_create_emits_feed_event() {
        let f = fixture();
        let mut receiver = f.events.subscribe();

        let root = f.service.create(top_level(1)).await.unwrap();
        let reply = f
            .service
            .create(top_level(2).replying_to(root.id))
            .await
            .unwrap();

        let first = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap()
            .unwrap();

        let events = [first, second];
        let reply_event = events
            .iter()
            .find(|e| e.get("commentId") == Some(reply.id.to_string().as_str()))
            .unwrap();
        assert_eq!(reply_event.get("commentator"), Some("2"));
        assert_eq!(reply_event.get("recipient"), Some("1"));
        assert_eq!(reply_event.get("bizPublisher"), Some(OWNER.to_string().as_str()));
        assert_eq!(reply_event.get("biz"), Some("answer"));
        assert_eq!(reply_event.get("bizId"), Some("42"));
    }
}
