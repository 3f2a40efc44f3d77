//! Fire-and-forget feed events emitted after a comment is created.

mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use types::{FeedEvent, FeedEventKind};

/// Errors that can occur while handing an event to the producer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event serialization failed: {0}")]
    Serialization(String),
    #[error("Event publish failed: {0}")]
    PublishFailed(String),
}

/// Sink for feed events.
///
/// Callers never wait on the outcome for their own correctness; failures are
/// only logged.
#[async_trait]
pub trait EventProducer: Send + Sync {
    async fn produce(&self, event: &FeedEvent) -> Result<(), EventError>;
}
