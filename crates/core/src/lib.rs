//! Functional core of the remarks comment service.
//!
//! Pure domain types, validation and tree-assembly functions, plus the traits
//! that the storage, cache, event and owner-lookup backends implement. Nothing
//! in this crate performs I/O.

pub mod audience;
pub mod cache;
pub mod comment;
pub mod events;
pub mod storage;
