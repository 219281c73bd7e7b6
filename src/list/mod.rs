//! List Module
//!
//! Recency-ordered doubly-linked list backed by a slot arena.

mod arena;
mod element;
mod ordered;
mod stats;


// Re-export public types
pub use element::{Element, NodeRef, SENTINEL_TTL};
pub use ordered::OrderedList;
pub use stats::ListStats;
