//! In-memory count cache with LRU eviction.
//!
//! Provides a thread-safe count cache with TTL support using tokio
//! synchronization primitives and LRU eviction policy. Keys are the same
//! strings the Redis backend uses.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use remarks_core::cache::{biz_comment_count_key, CountCache, Result};
use remarks_core::comment::Biz;

/// A cached count with its expiration.
#[derive(Debug, Clone, Copy)]
struct CountEntry {
    count: i64,
    expires_at: Instant,
}

impl CountEntry {
    fn new(count: i64, ttl: Duration) -> Self {
        Self {
            count,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// In-memory count cache with LRU eviction.
///
/// Supports TTL with lazy expiration (entries are cleaned up on access).
/// Uses LRU eviction to limit memory usage when max_entries is reached.
#[derive(Debug, Clone)]
pub struct MemoryCountCache {
    store: Arc<RwLock<LruCache<String, CountEntry>>>,
}

impl MemoryCountCache {
    /// Creates a new count cache holding at most `max_entries` counts.
    ///
    /// A zero capacity is raised to one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Adds `delta` to a live entry. Expired entries are dropped and count as a miss.
    async fn adjust_if_present(&self, biz: Biz, biz_id: i64, delta: i64) -> bool {
        let key = biz_comment_count_key(biz, biz_id);
        let mut store = self.store.write().await;

        let Some(entry) = store.get_mut(&key) else {
            return false;
        };
        if entry.is_expired() {
            store.pop(&key);
            return false;
        }
        entry.count += delta;
        true
    }
}

#[async_trait]
impl CountCache for MemoryCountCache {
    async fn get_count(&self, biz: Biz, biz_id: i64) -> Result<Option<i64>> {
        let key = biz_comment_count_key(biz, biz_id);
        let mut store = self.store.write().await;

        let Some(entry) = store.get(&key).copied() else {
            return Ok(None);
        };
        if entry.is_expired() {
            store.pop(&key);
            return Ok(None);
        }
        Ok(Some(entry.count))
    }

    async fn set_count(&self, biz: Biz, biz_id: i64, count: i64, ttl: Duration) -> Result<()> {
        let key = biz_comment_count_key(biz, biz_id);
        let mut store = self.store.write().await;
        store.put(key, CountEntry::new(count, ttl));
        Ok(())
    }

    async fn increment_if_present(&self, biz: Biz, biz_id: i64) -> Result<bool> {
        Ok(self.adjust_if_present(biz, biz_id, 1).await)
    }

    async fn decrement_if_present(&self, biz: Biz, biz_id: i64) -> Result<bool> {
        Ok(self.adjust_if_present(biz, biz_id, -1).await)
    }
}
