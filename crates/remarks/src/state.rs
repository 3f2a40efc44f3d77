//! Application state wired from the selected backends.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. Backend combinations are chosen via feature flags.

use std::sync::Arc;

use remarks_core::audience::OwnerRegistry;
use remarks_core::events::EventProducer;
use remarks_core::storage::CommentRepository;

use crate::config::Config;
use crate::owners::HttpOwnerLookup;
use crate::service::{CommentService, ServiceSettings};
use crate::tasks::BackgroundTasks;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<CommentService>,
}

impl AppState {
    /// Creates an AppState around a (cached) repository and an event producer.
    fn build(
        repository: Arc<dyn CommentRepository>,
        events: Arc<dyn EventProducer>,
        owners: OwnerRegistry,
        tasks: BackgroundTasks,
        config: &Config,
    ) -> Self {
        let settings = ServiceSettings {
            max_page_size: config.max_page_size,
            event_timeout: config.event_timeout(),
            degraded: config.degraded_mode,
        };

        tracing::info!(
            registered = ?owners.registered(),
            count_strategy = %config.count_strategy,
            degraded = config.degraded_mode,
            "Comment service configured"
        );

        Self {
            comments: Arc::new(CommentService::new(
                repository, owners, events, tasks, settings,
            )),
        }
    }
}

/// Builds one HTTP owner lookup per configured business type.
fn owner_registry(config: &Config) -> Result<OwnerRegistry, anyhow::Error> {
    let client = reqwest::Client::builder()
        .timeout(config.owner_lookup_timeout())
        .build()?;

    let registry = config
        .owner_urls()
        .into_iter()
        .fold(OwnerRegistry::new(), |registry, (biz, url)| {
            registry.with(biz, Arc::new(HttpOwnerLookup::new(client.clone(), biz, url)))
        });

    if registry.registered().is_empty() {
        tracing::warn!("No owner service configured, every comment create will be rejected");
    }
    Ok(registry)
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::memory::{MemoryCountCache, MemoryEventBus};
    use crate::storage::cached::CachedCommentRepository;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo =
                Arc::new(SqliteRepository::new(&config.sqlite_path, config.count_strategy).await?);
            let memory_cache = Arc::new(MemoryCountCache::new(config.cache_max_entries));
            let memory_events = Arc::new(MemoryEventBus::new());
            let tasks = BackgroundTasks::new(config.background_max_inflight);

            let cached_repo = Arc::new(CachedCommentRepository::new(
                sqlite_repo,
                memory_cache,
                tasks.clone(),
                config.cache_ttl(),
                config.backfill_timeout(),
            ));

            Ok(Self::build(
                cached_repo,
                memory_events,
                owner_registry(config)?,
                tasks,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::redis_impl::{RedisCountCache, RedisEventProducer};
    use crate::storage::cached::CachedCommentRepository;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let sqlite_repo =
                Arc::new(SqliteRepository::new(&config.sqlite_path, config.count_strategy).await?);
            let redis_cache = Arc::new(RedisCountCache::new(&config.redis_url).await?);
            let redis_events = Arc::new(RedisEventProducer::new(&config.redis_url).await?);
            let tasks = BackgroundTasks::new(config.background_max_inflight);

            let cached_repo = Arc::new(CachedCommentRepository::new(
                sqlite_repo,
                redis_cache,
                tasks.clone(),
                config.cache_ttl(),
                config.backfill_timeout(),
            ));

            Ok(Self::build(
                cached_repo,
                redis_events,
                owner_registry(config)?,
                tasks,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::memory::{MemoryCountCache, MemoryEventBus};
    use crate::storage::cached::CachedCommentRepository;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for running without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new(config.count_strategy));
            let memory_cache = Arc::new(MemoryCountCache::new(config.cache_max_entries));
            let memory_events = Arc::new(MemoryEventBus::new());
            let tasks = BackgroundTasks::new(config.background_max_inflight);

            let cached_repo = Arc::new(CachedCommentRepository::new(
                inmemory_repo,
                memory_cache,
                tasks.clone(),
                config.cache_ttl(),
                config.backfill_timeout(),
            ));

            Ok(Self::build(
                cached_repo,
                memory_events,
                owner_registry(config)?,
                tasks,
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::redis_impl::{RedisCountCache, RedisEventProducer};
    use crate::storage::cached::CachedCommentRepository;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let inmemory_repo = Arc::new(InMemoryRepository::new(config.count_strategy));
            let redis_cache = Arc::new(RedisCountCache::new(&config.redis_url).await?);
            let redis_events = Arc::new(RedisEventProducer::new(&config.redis_url).await?);
            let tasks = BackgroundTasks::new(config.background_max_inflight);

            let cached_repo = Arc::new(CachedCommentRepository::new(
                inmemory_repo,
                redis_cache,
                tasks.clone(),
                config.cache_ttl(),
                config.backfill_timeout(),
            ));

            Ok(Self::build(
                cached_repo,
                redis_events,
                owner_registry(config)?,
                tasks,
                config,
            ))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::cache::memory::{MemoryCountCache, MemoryEventBus};
    use crate::owners::StaticOwnerLookup;
    use crate::storage::cached::CachedCommentRepository;
    use crate::storage::inmemory::InMemoryRepository;
    use remarks_core::comment::Biz;

    /// Object id every test owner lookup knows about.
    pub const KNOWN_BIZ_ID: i64 = 42;
    /// Owner returned for [`KNOWN_BIZ_ID`].
    pub const KNOWN_OWNER: i64 = 900;

    impl Default for AppState {
        /// Creates an AppState with in-memory backends for testing.
        ///
        /// Answers and questions are registered; evaluations are not.
        fn default() -> Self {
            let config = Config {
                degraded_mode: false,
                max_page_size: 50,
                ..Config::default()
            };
            let tasks = BackgroundTasks::new(16);
            let repository = Arc::new(CachedCommentRepository::new(
                Arc::new(InMemoryRepository::default()),
                Arc::new(MemoryCountCache::new(100)),
                tasks.clone(),
                config.cache_ttl(),
                config.backfill_timeout(),
            ));
            let owners = [Biz::Answer, Biz::Question]
                .into_iter()
                .fold(OwnerRegistry::new(), |registry, biz| {
                    registry.with(
                        biz,
                        Arc::new(StaticOwnerLookup::new(biz).with_owner(KNOWN_BIZ_ID, KNOWN_OWNER)),
                    )
                });

            Self::build(
                repository,
                Arc::new(MemoryEventBus::new()),
                owners,
                tasks,
                &config,
            )
        }
    }
}
