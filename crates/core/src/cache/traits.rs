use std::time::Duration;

use async_trait::async_trait;

use crate::comment::Biz;

use super::Result;

/// A disposable, TTL-bounded shadow of the per-object comment count.
///
/// The cache has no authority: every value can be dropped and recomputed from
/// storage. A miss is `Ok(None)`, never an error.
#[async_trait]
pub trait CountCache: Send + Sync {
    /// Gets the cached count for an object.
    async fn get_count(&self, biz: Biz, biz_id: i64) -> Result<Option<i64>>;

    /// Stores a count with the given time-to-live.
    async fn set_count(&self, biz: Biz, biz_id: i64, count: i64, ttl: Duration) -> Result<()>;

    /// Adds one to an existing count. Returns false, without creating the key, on a miss.
    async fn increment_if_present(&self, biz: Biz, biz_id: i64) -> Result<bool>;

    /// Subtracts one from an existing count. Returns false, without creating the key, on a miss.
    async fn decrement_if_present(&self, biz: Biz, biz_id: i64) -> Result<bool>;
}
