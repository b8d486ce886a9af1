//! Order index - direct-mapped open-addressed lookup from id to arena slot.
//!
//! The natural slot is `id mod capacity`; collisions resolve by wrapping
//! linear probes. Sequential ids (the expected workload) land at their
//! natural slot, so the common lookup resolves at the first probe.
//!
//! Deletion uses backward-shift repair: after vacating an entry, every
//! subsequent entry along the probe chain is rehashed in place until the
//! first vacancy, so no displaced entry is ever stranded behind a hole.

use crate::arena::{Arena, ArenaIndex, NULL_INDEX};
use crate::types::OrderId;

/// Direct-mapped table of arena indices keyed by order id.
///
/// The table only stores indices; ids are read through the arena, which
/// keeps each table slot at 4 bytes.
pub struct OrderIndex {
    slots: Vec<ArenaIndex>,
    capacity: usize,
}

impl OrderIndex {
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "index capacity must be non-zero");
        Self {
            slots: vec![NULL_INDEX; capacity],
            capacity,
        }
    }

    #[inline]
    fn natural_slot(&self, id: OrderId) -> usize {
        (id.raw() % self.capacity as u64) as usize
    }

    /// Place an order in the table.
    ///
    /// Returns `false` if an entry with the same id already exists, or if
    /// a full sweep finds no vacancy.
    pub fn insert(&mut self, arena: &Arena, index: ArenaIndex) -> bool {
        let id = arena.get(index).id;
        let start = self.natural_slot(id);
        let mut slot = start;

        while self.slots[slot] != NULL_INDEX {
            if arena.get(self.slots[slot]).id == id {
                return false;
            }
            slot = (slot + 1) % self.capacity;
            if slot == start {
                return false;
            }
        }

        self.slots[slot] = index;
        true
    }

    /// Find the arena slot holding `id`.
    ///
    /// The probe stops at the first vacancy (miss) or after a full cycle
    /// (miss on a saturated table).
    pub fn lookup(&self, arena: &Arena, id: OrderId) -> Option<ArenaIndex> {
        let start = self.natural_slot(id);
        let mut slot = start;

        loop {
            let entry = self.slots[slot];
            if entry == NULL_INDEX {
                return None;
            }
            if arena.get(entry).id == id {
                return Some(entry);
            }
            slot = (slot + 1) % self.capacity;
            if slot == start {
                return None;
            }
        }
    }

    /// Remove `id` and repair the probe chain behind it.
    ///
    /// Each entry between the vacated slot and the next vacancy is pulled
    /// out and re-inserted; re-insertion may move it earlier, including
    /// back to its natural slot.
    pub fn remove(&mut self, arena: &Arena, id: OrderId) {
        let start = self.natural_slot(id);
        let mut slot = start;

        while self.slots[slot] != NULL_INDEX {
            if arena.get(self.slots[slot]).id == id {
                self.slots[slot] = NULL_INDEX;

                let mut next = (slot + 1) % self.capacity;
                while self.slots[next] != NULL_INDEX {
                    let displaced = self.slots[next];
                    self.slots[next] = NULL_INDEX;
                    self.insert(arena, displaced);
                    next = (next + 1) % self.capacity;
                }
                return;
            }
            slot = (slot + 1) % self.capacity;
            if slot == start {
                return;
            }
        }
    }

    /// Number of occupied table slots. Linear scan; intended for
    /// invariant checks, not the hot path.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|&&s| s != NULL_INDEX).count()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
