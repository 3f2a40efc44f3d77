//! Cached repository decorators.
//!
//! This module provides a decorator that wraps `CommentRepository` with a
//! count cache using the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and repopulate the cache in the background
//! - **Writes**: Persist to repository, then adjust the cached count if present
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(SqliteRepository::new("remarks.db", CountStrategy::Materialized).await?);
//! let cache = Arc::new(MemoryCountCache::new(10_000));
//!
//! let cached_repo = CachedCommentRepository::new(
//!     repo,
//!     cache,
//!     BackgroundTasks::new(256),
//!     Duration::from_secs(600),
//!     Duration::from_secs(1),
//! );
//! ```

mod comment;

pub use comment::CachedCommentRepository;
