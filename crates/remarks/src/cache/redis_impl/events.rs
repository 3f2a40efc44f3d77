//! Redis feed event producer.
//!
//! Publishes feed events as JSON on a single pub/sub channel for the
//! downstream feed consumer.

use async_trait::async_trait;
use redis::AsyncCommands;

use remarks_core::cache::{Result, FEED_EVENTS_CHANNEL};
use remarks_core::events::{EventError, EventProducer, FeedEvent};

use super::error::map_redis_error;

/// Redis pub/sub producer for feed events.
pub struct RedisEventProducer {
    conn: redis::aio::ConnectionManager,
    channel: String,
}

impl RedisEventProducer {
    /// Creates a new producer publishing on the default feed channel.
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
            channel: FEED_EVENTS_CHANNEL.to_string(),
        })
    }
}

#[async_trait]
impl EventProducer for RedisEventProducer {
    async fn produce(&self, event: &FeedEvent) -> std::result::Result<(), EventError> {
        let payload =
            serde_json::to_string(event).map_err(|e| EventError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(&self.channel, &payload)
            .await
            .map_err(|e| EventError::PublishFailed(e.to_string()))?;

        tracing::trace!(channel = %self.channel, receivers, "Feed event published");
        Ok(())
    }
}
