//! In-memory feed event bus.
//!
//! Delivers feed events to in-process subscribers using a tokio broadcast
//! channel.

use async_trait::async_trait;
use tokio::sync::broadcast;

use remarks_core::events::{EventError, EventProducer, FeedEvent};

/// Channel capacity for feed events.
const CHANNEL_CAPACITY: usize = 100;

/// In-memory feed event bus.
///
/// Publishing with no subscribers is not an error; the event is simply dropped.
#[derive(Debug, Clone)]
pub struct MemoryEventBus {
    sender: broadcast::Sender<FeedEvent>,
}

impl MemoryEventBus {
    /// Creates a new bus with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribes to every event produced after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventProducer for MemoryEventBus {
    async fn produce(&self, event: &FeedEvent) -> Result<(), EventError> {
        let receivers = self.sender.send(event.clone()).unwrap_or(0);
        tracing::trace!(receivers, "Feed event produced");
        Ok(())
    }
}
