//! Cache backend implementations.
//!
//! This module provides concrete implementations of `CountCache` and
//! `EventProducer` defined in `remarks_core`. The implementations are
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory count cache and event bus using tokio synchronization primitives
//! - `redis`: Redis count cache and pub/sub producer using the redis crate
//!
//! These features are mutually exclusive - only one cache backend can be
//! enabled at a time.

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p remarks --features memory"
);

#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

// Re-export the active cache implementation
#[cfg(feature = "memory")]
pub use memory::{MemoryCountCache, MemoryEventBus};

#[cfg(feature = "redis")]
pub use redis_impl::{RedisCountCache, RedisEventProducer};
