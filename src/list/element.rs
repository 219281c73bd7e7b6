//! List Element Module
//!
//! Defines the records the list hands back to callers and the handles
//! callers keep in their key index.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

// == Sentinel TTL ==
/// TTL marker carried by the head and tail sentinels. Never compared
/// against real TTLs.
pub const SENTINEL_TTL: i64 = -1;

// == Node Ref ==
/// Opaque handle to an element linked in an [`OrderedList`](super::OrderedList).
///
/// Returned by `insert` and meant to be stored in the caller's key index.
/// A handle stays valid until its element is removed; after that (or when
/// passed to a different list) operations reject it with `StaleNode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub(crate) list: u64,
    pub(crate) slot: usize,
    pub(crate) generation: u64,
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "list {} slot {} generation {}",
            self.list, self.slot, self.generation
        )
    }
}

// == Element ==
/// One cache entry's record in recency order.
///
/// The list stores `ttl` and `created_at` but never acts on them; expiry
/// decisions belong to the caller.
#[derive(Debug, Clone)]
pub struct Element<V> {
    node: NodeRef,
    /// Caller-supplied key
    pub key: String,
    /// Caller-supplied payload
    pub value: V,
    /// Time-to-live in seconds, negative means none
    pub ttl: i64,
    /// Time the element was inserted
    pub created_at: DateTime<Utc>,
}

impl<V> Element<V> {
    // == Constructor ==
    /// Creates an element stamped with the current time.
    pub(crate) fn new(node: NodeRef, key: String, value: V, ttl: i64) -> Self {
        Self {
            node,
            key,
            value,
            ttl,
            created_at: Utc::now(),
        }
    }

    // == Node ==
    /// Handle under which this element is (or was) linked.
    pub fn node(&self) -> NodeRef {
        self.node
    }

    // == Into Value ==
    /// Consumes the element, returning the payload.
    pub fn into_value(self) -> V {
        self.value
    }

    // == Expires At ==
    /// Returns `created_at + ttl`, or None if the TTL is negative or the
    /// sum is out of range.
    ///
    /// This is a helper for caller-side TTL policies; no list operation
    /// consults it.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.ttl < 0 {
            return None;
        }
        TimeDelta::try_seconds(self.ttl).and_then(|ttl| self.created_at.checked_add_signed(ttl))
    }
}
