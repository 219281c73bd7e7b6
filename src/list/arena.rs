//! Slot Arena Module
//!
//! Backing storage for the list. Links are slot indices into one vector,
//! so previous/next are plain lookups instead of an ownership cycle. The
//! head and tail sentinels are pinned at fixed slots and freed slots are
//! recycled through a free list.

use super::element::Element;

/// Slot of the head sentinel. `next(HEAD)` is the most recently used element.
pub(crate) const HEAD: usize = 0;
/// Slot of the tail sentinel. `prev(TAIL)` is the least recently used element.
pub(crate) const TAIL: usize = 1;

#[derive(Debug)]
struct Slot<V> {
    prev: usize,
    next: usize,
    /// Bumped every time the slot is released
    generation: u64,
    /// None for sentinels and free slots
    element: Option<Element<V>>,
}

impl<V> Slot<V> {
    fn vacant() -> Self {
        Self {
            prev: HEAD,
            next: TAIL,
            generation: 0,
            element: None,
        }
    }
}

// == Arena ==
#[derive(Debug)]
pub(crate) struct Arena<V> {
    slots: Vec<Slot<V>>,
    free_list: Vec<usize>,
}

impl<V> Arena<V> {
    // == Constructor ==
    /// Creates an arena holding only the two sentinels, linked to each other.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(2));
        slots.push(Slot::vacant());
        slots.push(Slot::vacant());

        Self {
            slots,
            free_list: Vec::new(),
        }
    }

    // == Allocation ==
    /// Fills a free slot with the element `build` produces for that slot and
    /// its current generation. The slot is not linked yet.
    pub(crate) fn alloc_with(
        &mut self,
        build: impl FnOnce(usize, u64) -> Element<V>,
    ) -> &Element<V> {
        let slot = match self.free_list.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::vacant());
                self.slots.len() - 1
            }
        };

        let entry = &mut self.slots[slot];
        entry.element.insert(build(slot, entry.generation))
    }

    /// Empties an unlinked slot and returns its element. Outstanding handles
    /// to the slot stop matching its generation.
    pub(crate) fn release(&mut self, slot: usize) -> Option<Element<V>> {
        if slot <= TAIL {
            return None;
        }
        let entry = self.slots.get_mut(slot)?;
        let element = entry.element.take()?;

        entry.generation += 1;
        entry.prev = HEAD;
        entry.next = TAIL;
        self.free_list.push(slot);
        Some(element)
    }

    /// True if `slot` currently holds an element of the given generation.
    pub(crate) fn is_live(&self, slot: usize, generation: u64) -> bool {
        slot > TAIL
            && self
                .slots
                .get(slot)
                .is_some_and(|entry| entry.generation == generation && entry.element.is_some())
    }

    pub(crate) fn element(&self, slot: usize) -> Option<&Element<V>> {
        self.slots.get(slot)?.element.as_ref()
    }

    pub(crate) fn next(&self, slot: usize) -> usize {
        self.slots[slot].next
    }

    pub(crate) fn prev(&self, slot: usize) -> usize {
        self.slots[slot].prev
    }

    // == Linking ==
    /// Splices `slot` in right after the head sentinel.
    pub(crate) fn push_front(&mut self, slot: usize) {
        let old_front = self.slots[HEAD].next;

        self.slots[slot].prev = HEAD;
        self.slots[slot].next = old_front;
        self.slots[old_front].prev = slot;
        self.slots[HEAD].next = slot;
    }

    /// Links the neighbours of `slot` to each other, bypassing it.
    pub(crate) fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let entry = &self.slots[slot];
            (entry.prev, entry.next)
        };

        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    // == Walking ==
    /// Elements from most to least recently used.
    pub(crate) fn walk_forward(&self) -> Walk<'_, V> {
        Walk {
            arena: self,
            cursor: self.next(HEAD),
            end: TAIL,
            forward: true,
        }
    }

    /// Elements from least to most recently used.
    pub(crate) fn walk_backward(&self) -> Walk<'_, V> {
        Walk {
            arena: self,
            cursor: self.prev(TAIL),
            end: HEAD,
            forward: false,
        }
    }
}

// == Walk ==
/// Iterator over linked elements between the sentinels.
pub(crate) struct Walk<'a, V> {
    arena: &'a Arena<V>,
    cursor: usize,
    end: usize,
    forward: bool,
}

impl<'a, V> Iterator for Walk<'a, V> {
    type Item = &'a Element<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.end {
            return None;
        }

        let slot = self.cursor;
        self.cursor = if self.forward {
            self.arena.next(slot)
        } else {
            self.arena.prev(slot)
        };
        self.arena.element(slot)
    }
}
