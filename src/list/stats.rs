//! List Statistics Module
//!
//! Tracks how the list is being driven: inserts, evictions, removals.

use serde::Serialize;

// == List Stats ==
/// Operation counters for an ordered list.
///
/// Updated under the list lock, so a snapshot is always consistent with
/// `total_entries`: `inserts - evictions - removals == total_entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListStats {
    /// Number of elements inserted
    pub inserts: u64,
    /// Number of elements removed from the LRU end
    pub evictions: u64,
    /// Number of elements removed by handle or by clearing the list
    pub removals: u64,
    /// Number of elements moved back to the MRU end
    pub promotions: u64,
    /// Number of operations that found the list empty
    pub empty_reads: u64,
    /// Current number of elements in the list
    pub total_entries: usize,
}

impl ListStats {
    // == Constructor ==
    /// Creates a new ListStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Eviction Rate ==
    /// Fraction of inserted elements that were later evicted from the LRU end.
    ///
    /// Returns evictions / inserts, or 0.0 if nothing was inserted.
    pub fn eviction_rate(&self) -> f64 {
        if self.inserts == 0 {
            0.0
        } else {
            self.evictions as f64 / self.inserts as f64
        }
    }

    pub(crate) fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_removal(&mut self) {
        self.removals += 1;
    }

    pub(crate) fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    pub(crate) fn record_empty(&mut self) {
        self.empty_reads += 1;
    }

    pub(crate) fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
