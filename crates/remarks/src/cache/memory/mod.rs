//! In-memory cache backend implementation.
//!
//! Provides a thread-safe count cache with TTL support and an in-process
//! feed event bus for single-instance deployments.

mod counts;
mod events;

pub use counts::MemoryCountCache;
pub use events::MemoryEventBus;
