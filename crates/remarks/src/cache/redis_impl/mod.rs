//! Redis cache backend implementation.
//!
//! Provides a shared count cache and a feed event producer for multi-instance
//! deployments, both over a pooled connection manager.

mod counts;
mod error;
mod events;

pub use counts::RedisCountCache;
pub use events::RedisEventProducer;
