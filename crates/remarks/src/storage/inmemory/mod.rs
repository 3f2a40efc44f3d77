//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of `CommentRepository`
//! that keeps all rows in maps behind one `Arc<RwLock<_>>`. This is useful
//! for testing and development scenarios where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use remarks::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::default();
//! // Use repo for testing...
//! ```

mod repository;

pub use repository::InMemoryRepository;
