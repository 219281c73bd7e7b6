//! Ordered List Module
//!
//! Thread-safe recency ordering for an LRU cache. New elements enter at the
//! most-recently-used end, eviction takes from the least-recently-used end,
//! and any element can be unlinked through the handle `insert` returned.
//!
//! Every operation holds one list-wide lock for its whole duration.
//! Elements carry no lock of their own.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::ListConfig;
use crate::error::{ListError, Result};
use crate::list::arena::{Arena, HEAD, TAIL};
use crate::list::{Element, ListStats, NodeRef};

/// Source of list ids, so handles from one list are rejected by another.
static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

// == Chain ==
/// Everything guarded by the list lock.
struct Chain<V> {
    arena: Arena<V>,
    size: usize,
    stats: ListStats,
}

impl<V> Chain<V> {
    /// Slot of the least recently used element.
    fn last_slot(&mut self) -> Result<usize> {
        if self.size == 0 {
            self.stats.record_empty();
            return Err(ListError::EmptyList);
        }
        Ok(self.arena.prev(TAIL))
    }

    /// Resolves a caller handle to a linked slot of list `list`.
    fn locate(&mut self, list: u64, node: NodeRef) -> Result<usize> {
        if self.size == 0 {
            self.stats.record_empty();
            return Err(ListError::EmptyList);
        }
        if node.list != list || !self.arena.is_live(node.slot, node.generation) {
            warn!(%node, "rejected handle that is not linked in this list");
            return Err(ListError::StaleNode(node));
        }
        Ok(node.slot)
    }

    /// Unlinks a live slot and frees it.
    fn detach(&mut self, slot: usize) -> Option<Element<V>> {
        self.arena.unlink(slot);
        let element = self.arena.release(slot)?;
        self.size -= 1;
        self.stats.set_total_entries(self.size);
        Some(element)
    }
}

// == Ordered List ==
/// Doubly-linked list whose order is recency of use.
///
/// The list does not index keys, enforce a capacity or expire entries:
/// callers keep a key → [`NodeRef`] map, decide when to call
/// [`remove_last`](Self::remove_last) and read TTL metadata off the
/// elements themselves.
pub struct OrderedList<V> {
    id: u64,
    default_ttl: i64,
    chain: Mutex<Chain<V>>,
}

impl<V> OrderedList<V> {
    // == Constructor ==
    /// Creates an empty list with default configuration.
    pub fn new() -> Self {
        Self::with_config(&ListConfig::default())
    }

    /// Creates an empty list, reserving `initial_capacity` element slots.
    pub fn with_config(config: &ListConfig) -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            default_ttl: config.default_ttl,
            chain: Mutex::new(Chain {
                arena: Arena::with_capacity(config.initial_capacity),
                size: 0,
                stats: ListStats::new(),
            }),
        }
    }

    // == Insert ==
    /// Links a new element at the most-recently-used position.
    ///
    /// The returned handle is what the caller stores in its index for a
    /// later [`remove_node`](Self::remove_node) or [`touch`](Self::touch).
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: i64) -> NodeRef {
        let key = key.into();
        let list = self.id;

        let mut chain = self.chain.lock();
        let node = chain
            .arena
            .alloc_with(|slot, generation| {
                let node = NodeRef {
                    list,
                    slot,
                    generation,
                };
                Element::new(node, key, value, ttl)
            })
            .node();
        chain.arena.push_front(node.slot);
        chain.size += 1;
        let size = chain.size;
        chain.stats.record_insert();
        chain.stats.set_total_entries(size);

        trace!(%node, size, "inserted element at MRU position");
        node
    }

    /// Same as [`insert`](Self::insert) with the configured default TTL.
    pub fn insert_default(&self, key: impl Into<String>, value: V) -> NodeRef {
        self.insert(key, value, self.default_ttl)
    }

    // == Remove Last ==
    /// Unlinks and returns the least recently used element.
    ///
    /// Fails with `EmptyList` when there is nothing to evict.
    pub fn remove_last(&self) -> Result<Element<V>> {
        let mut chain = self.chain.lock();
        let slot = chain.last_slot()?;
        let element = chain.detach(slot).ok_or(ListError::EmptyList)?;
        chain.stats.record_eviction();

        debug!(key = %element.key, size = chain.size, "evicted least recently used element");
        Ok(element)
    }

    // == Remove Node ==
    /// Unlinks and returns the element behind `node`, wherever it sits.
    ///
    /// Fails with `EmptyList` on an empty list and with `StaleNode` if the
    /// handle came from another list or its element was already removed.
    pub fn remove_node(&self, node: NodeRef) -> Result<Element<V>> {
        let mut chain = self.chain.lock();
        let slot = chain.locate(self.id, node)?;
        let element = chain.detach(slot).ok_or(ListError::StaleNode(node))?;
        chain.stats.record_removal();

        debug!(key = %element.key, size = chain.size, "removed element");
        Ok(element)
    }

    // == Peek Last ==
    /// Runs `f` on the least recently used element without unlinking it.
    ///
    /// # Deadlocks
    ///
    /// `f` runs while the list lock is held, and the lock is not re-entrant.
    /// Calling any method of the same list from inside `f` (including its
    /// `Debug` impl) blocks the thread forever. To act on the element, e.g.
    /// remove it once it has expired, take a copy with
    /// [`get_last_node`](Self::get_last_node) and then call
    /// `remove_node(element.node())`.
    pub fn peek_last<R>(&self, f: impl FnOnce(&Element<V>) -> R) -> Result<R> {
        let mut chain = self.chain.lock();
        let slot = chain.last_slot()?;
        chain.arena.element(slot).map(f).ok_or(ListError::EmptyList)
    }

    // == Get Last Node ==
    /// Returns a copy of the least recently used element without unlinking it.
    ///
    /// Its [`node`](Element::node) can be passed to `remove_node` afterwards,
    /// e.g. once a sweeper decides the entry has expired.
    pub fn get_last_node(&self) -> Result<Element<V>>
    where
        V: Clone,
    {
        self.peek_last(Element::clone)
    }

    // == Touch ==
    /// Moves a linked element to the most-recently-used position.
    ///
    /// The handle stays valid. Errors match [`remove_node`](Self::remove_node).
    pub fn touch(&self, node: NodeRef) -> Result<()> {
        let mut chain = self.chain.lock();
        let slot = chain.locate(self.id, node)?;

        if chain.arena.next(HEAD) != slot {
            chain.arena.unlink(slot);
            chain.arena.push_front(slot);
        }
        chain.stats.record_promotion();

        trace!(%node, "promoted element to MRU position");
        Ok(())
    }

    // == Lookup ==
    /// Runs `f` on the element behind `node`.
    ///
    /// Fails with `StaleNode` if the handle is not linked in this list,
    /// which includes every handle when the list is empty.
    ///
    /// # Deadlocks
    ///
    /// `f` runs while the list lock is held, and the lock is not re-entrant.
    /// Calling any method of the same list from inside `f` blocks the thread
    /// forever. Use [`get`](Self::get) to take a copy first when the
    /// follow-up needs the list.
    pub fn with_node<R>(&self, node: NodeRef, f: impl FnOnce(&Element<V>) -> R) -> Result<R> {
        let chain = self.chain.lock();
        if node.list != self.id || !chain.arena.is_live(node.slot, node.generation) {
            return Err(ListError::StaleNode(node));
        }
        chain
            .arena
            .element(node.slot)
            .map(f)
            .ok_or(ListError::StaleNode(node))
    }

    /// Returns a copy of the element behind `node`.
    pub fn get(&self, node: NodeRef) -> Result<Element<V>>
    where
        V: Clone,
    {
        self.with_node(node, Element::clone)
    }

    /// True if `node` refers to an element currently linked in this list.
    pub fn contains(&self, node: NodeRef) -> bool {
        node.list == self.id && self.chain.lock().arena.is_live(node.slot, node.generation)
    }

    // == Length ==
    /// Returns the number of linked elements.
    pub fn len(&self) -> usize {
        self.chain.lock().size
    }

    // == Is Empty ==
    /// Returns true if no elements are linked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Keys ==
    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let chain = self.chain.lock();
        chain.arena.walk_forward().map(|e| e.key.clone()).collect()
    }

    /// Keys from least to most recently used, following `previous` links.
    pub fn keys_from_lru(&self) -> Vec<String> {
        let chain = self.chain.lock();
        chain.arena.walk_backward().map(|e| e.key.clone()).collect()
    }

    // == Clear ==
    /// Unlinks every element and returns how many were removed.
    ///
    /// Each cleared element counts as a removal in [`stats`](Self::stats).
    /// All outstanding handles become stale.
    pub fn clear(&self) -> usize {
        let mut chain = self.chain.lock();
        let mut removed = 0;

        loop {
            let slot = chain.arena.prev(TAIL);
            if slot == HEAD {
                break;
            }
            chain.arena.unlink(slot);
            chain.arena.release(slot);
            chain.stats.record_removal();
            removed += 1;
        }
        chain.size = 0;
        chain.stats.set_total_entries(0);

        debug!(removed, "cleared list");
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> ListStats {
        self.chain.lock().stats.clone()
    }
}

impl<V> Default for OrderedList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for OrderedList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedList")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}
