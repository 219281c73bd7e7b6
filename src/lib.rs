//! Recency List - the ordering primitive behind an LRU cache
//!
//! A thread-safe doubly-linked list with O(1) insert at the most recently
//! used end, O(1) eviction from the least recently used end and O(1)
//! removal of any element by handle. Key lookup, capacity and TTL policy
//! are left to the cache built on top of it.

pub mod config;
pub mod error;
pub mod list;

pub use config::ListConfig;
pub use error::{ListError, Result};
pub use list::{Element, ListStats, NodeRef, OrderedList};
