//! Redis count cache implementation.
//!
//! Counts are plain integer keys with an expiry. Increment and decrement run
//! as one Lua script so a key that expired or was never backfilled is not
//! resurrected with a partial count.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use remarks_core::cache::{biz_comment_count_key, CountCache, Result};
use remarks_core::comment::Biz;

use super::error::map_redis_error;

/// Adds `ARGV[1]` to `KEYS[1]` only if the key exists. Returns nil on a miss.
const ADJUST_IF_PRESENT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return redis.call('INCRBY', KEYS[1], ARGV[1])
end
return nil
"#;

/// Redis count cache using a connection manager for pooling.
pub struct RedisCountCache {
    conn: redis::aio::ConnectionManager,
    adjust: redis::Script,
}

impl RedisCountCache {
    /// Creates a new Redis count cache connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self {
            conn,
            adjust: redis::Script::new(ADJUST_IF_PRESENT),
        })
    }

    async fn adjust_if_present(&self, biz: Biz, biz_id: i64, delta: i64) -> Result<bool> {
        let mut conn = self.conn.clone();
        let key = biz_comment_count_key(biz, biz_id);

        let result: Option<i64> = self
            .adjust
            .key(&key)
            .arg(delta)
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(result.is_some())
    }
}

#[async_trait]
impl CountCache for RedisCountCache {
    async fn get_count(&self, biz: Biz, biz_id: i64) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        let key = biz_comment_count_key(biz, biz_id);
        let result: Option<i64> = conn.get(&key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set_count(&self, biz: Biz, biz_id: i64, count: i64, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let key = biz_comment_count_key(biz, biz_id);
        let seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, count, seconds)
            .await
            .map_err(map_redis_error)?;

        Ok(())
    }

    async fn increment_if_present(&self, biz: Biz, biz_id: i64) -> Result<bool> {
        self.adjust_if_present(biz, biz_id, 1).await
    }

    async fn decrement_if_present(&self, biz: Biz, biz_id: i64) -> Result<bool> {
        self.adjust_if_present(biz, biz_id, -1).await
    }
}
