//! Order arena - fixed-capacity slot pool with an embedded free list.
//!
//! All order storage is reserved up front, so the hot path never touches
//! the system allocator. Free slots are threaded through the `next` link
//! of the order record itself; acquire and release are both O(1).

use crate::types::{OrdType, OrderId, Price, Qty, Side, Timestamp};
use std::fmt;

/// Sentinel value representing a null/invalid index.
pub const NULL_INDEX: u32 = u32::MAX;

/// Arena slot index - a compressed pointer.
///
/// 32-bit indices halve link metadata relative to raw pointers, so a
/// traversal touches fewer cache lines.
pub type ArenaIndex = u32;

/// A single resting order - exactly 64 bytes (one cache line).
///
/// Hot fields lead the record: the intrusive links come first (touched by
/// every list operation), then id/price (lookup and cancel), then the
/// quantities (matching).
#[repr(C, align(64))]
#[derive(Clone, Copy)]
pub struct Order {
    /// Previous order at the same price level.
    pub prev: ArenaIndex,
    /// Next order at the same price level; doubles as the free-list link
    /// while the slot is unallocated.
    pub next: ArenaIndex,

    /// External order id.
    pub id: OrderId,
    /// Limit price in ticks.
    pub price: Price,

    /// Remaining quantity.
    pub qty: Qty,
    /// Quantity at rest time; immutable afterwards.
    pub orig_qty: Qty,

    /// Caller-supplied timestamp.
    pub ts: Timestamp,
    pub side: Side,
    pub ord_type: OrdType,

    _pad: [u8; 14],
}

const _: () = assert!(
    std::mem::size_of::<Order>() == 64,
    "Order must be exactly 64 bytes (one cache line)"
);
const _: () = assert!(
    std::mem::align_of::<Order>() == 64,
    "Order must be cache-line aligned"
);

impl Order {
    #[inline]
    pub fn new(
        id: OrderId,
        price: Price,
        qty: Qty,
        side: Side,
        ord_type: OrdType,
        ts: Timestamp,
    ) -> Self {
        Self {
            prev: NULL_INDEX,
            next: NULL_INDEX,
            id,
            price,
            qty,
            orig_qty: qty,
            ts,
            side,
            ord_type,
            _pad: [0u8; 14],
        }
    }

    /// An unallocated slot.
    #[inline]
    pub(crate) const fn vacant() -> Self {
        Self {
            prev: NULL_INDEX,
            next: NULL_INDEX,
            id: OrderId::new(0),
            price: Price::new(0),
            qty: Qty::new(0),
            orig_qty: Qty::new(0),
            ts: Timestamp::new(0),
            side: Side::Buy,
            ord_type: OrdType::Limit,
            _pad: [0u8; 14],
        }
    }

    /// Reduce remaining quantity by a fill.
    #[inline]
    pub fn fill(&mut self, amount: Qty) {
        self.qty -= amount;
    }

    /// True once the remaining quantity has been consumed.
    #[inline]
    pub fn filled(&self) -> bool {
        self.qty.raw() <= 0
    }

    #[inline]
    pub fn remaining(&self) -> Qty {
        self.qty
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Order")
            .field("id", &self.id)
            .field("price", &self.price)
            .field("qty", &self.qty)
            .field("orig_qty", &self.orig_qty)
            .field("side", &self.side)
            .field("ord_type", &self.ord_type)
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}

/// Pre-allocated order pool with O(1) acquire and release.
///
/// The free list is built in reverse index order at construction, so the
/// first acquisitions hand out slots 0, 1, 2, ... - contiguous at the low
/// end of the arena.
pub struct Arena {
    slots: Vec<Order>,
    free_head: ArenaIndex,
    used: u32,
    capacity: u32,
}

impl Arena {
    /// Create an arena with the given slot capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is 0 or would collide with `NULL_INDEX`.
    pub fn new(capacity: u32) -> Self {
        assert!(capacity > 0, "arena capacity must be non-zero");
        assert!(capacity < NULL_INDEX, "arena capacity must be below NULL_INDEX");

        let mut slots = vec![Order::vacant(); capacity as usize];

        let mut free_head = NULL_INDEX;
        for i in (0..capacity).rev() {
            slots[i as usize].next = free_head;
            free_head = i;
        }

        Self {
            slots,
            free_head,
            used: 0,
            capacity,
        }
    }

    /// Take a slot off the free list. Returns `None` when exhausted.
    #[inline]
    pub fn acquire(&mut self) -> Option<ArenaIndex> {
        if self.free_head == NULL_INDEX {
            return None;
        }

        let index = self.free_head;
        self.free_head = self.slots[index as usize].next;
        self.used += 1;

        self.slots[index as usize].prev = NULL_INDEX;
        self.slots[index as usize].next = NULL_INDEX;

        Some(index)
    }

    /// Return a slot to the free list.
    ///
    /// The caller must have already unlinked the order from any level and
    /// index; no double-release protection beyond debug assertions.
    #[inline]
    pub fn release(&mut self, index: ArenaIndex) {
        debug_assert!(index < self.capacity, "index out of bounds");
        debug_assert!(self.used > 0, "release on empty arena");

        self.slots[index as usize].next = self.free_head;
        self.free_head = index;
        self.used -= 1;
    }

    #[inline]
    pub fn get(&self, index: ArenaIndex) -> &Order {
        debug_assert!(index < self.capacity, "index out of bounds");
        &self.slots[index as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, index: ArenaIndex) -> &mut Order {
        debug_assert!(index < self.capacity, "index out of bounds");
        &mut self.slots[index as usize]
    }

    /// Number of slots currently acquired.
    #[inline]
    pub fn used(&self) -> u32 {
        self.used
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn available(&self) -> u32 {
        self.capacity - self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head == NULL_INDEX
    }

    /// Pre-fault every slot so the OS maps the pages before measurement.
    pub fn warm_up(&mut self) {
        for slot in &mut self.slots {
            // Volatile write to prevent the touch from being optimized out
            unsafe {
                std::ptr::write_volatile(&mut slot._pad[0], 0);
            }
        }
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .field("free_head", &self.free_head)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrdType, OrderId, Price, Qty, Side, Timestamp};

    #[test]
    fn test_order_size() {
        assert_eq!(std::mem::size_of::<Order>(), 64);
        assert_eq!(std::mem::align_of::<Order>(), 64);
    }

    #[test]
    fn test_order_new() {
        let o = Order::new(
            OrderId::new(7),
            Price::new(100),
            Qty::new(50),
            Side::Sell,
            OrdType::Limit,
            Timestamp::new(3),
        );
        assert_eq!(o.id, OrderId::new(7));
        assert_eq!(o.qty, Qty::new(50));
        assert_eq!(o.orig_qty, Qty::new(50));
        assert_eq!(o.prev, NULL_INDEX);
        assert_eq!(o.next, NULL_INDEX);
    }

    #[test]
    fn test_order_fill() {
        let mut o = Order::new(
            OrderId::new(1),
            Price::new(100),
            Qty::new(10),
            Side::Buy,
            OrdType::Limit,
            Timestamp::new(0),
        );
        o.fill(Qty::new(4));
        assert_eq!(o.remaining(), Qty::new(6));
        assert!(!o.filled());
        o.fill(Qty::new(6));
        assert!(o.filled());
        assert_eq!(o.orig_qty, Qty::new(10));
    }

    #[test]
    fn test_arena_creation() {
        let arena = Arena::new(100);
        assert_eq!(arena.capacity(), 100);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.available(), 100);
        assert!(arena.is_empty());
        assert!(!arena.is_full());
    }

    #[test]
    fn test_low_slots_acquired_first() {
        let mut arena = Arena::new(10);
        assert_eq!(arena.acquire(), Some(0));
        assert_eq!(arena.acquire(), Some(1));
        assert_eq!(arena.acquire(), Some(2));
    }

    #[test]
    fn test_acquire_release_cycle() {
        let mut arena = Arena::new(3);

        let a = arena.acquire().unwrap();
        let b = arena.acquire().unwrap();
        let c = arena.acquire().unwrap();

        assert_eq!(arena.used(), 3);
        assert!(arena.is_full());
        assert_eq!(arena.acquire(), None);

        arena.release(b);
        assert_eq!(arena.used(), 2);
        assert!(!arena.is_full());

        // The freed slot is handed back next
        assert_eq!(arena.acquire(), Some(b));

        arena.release(a);
        arena.release(b);
        arena.release(c);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_slot_data_round_trip() {
        let mut arena = Arena::new(4);
        let idx = arena.acquire().unwrap();
        *arena.get_mut(idx) = Order::new(
            OrderId::new(42),
            Price::new(9999),
            Qty::new(17),
            Side::Buy,
            OrdType::IOC,
            Timestamp::new(5),
        );

        let o = arena.get(idx);
        assert_eq!(o.id, OrderId::new(42));
        assert_eq!(o.price, Price::new(9999));
        assert_eq!(o.qty, Qty::new(17));
        assert_eq!(o.side, Side::Buy);
        assert_eq!(o.ord_type, OrdType::IOC);
    }

    #[test]
    fn test_warm_up() {
        let mut arena = Arena::new(1000);
        arena.warm_up();
        assert_eq!(arena.used(), 0);
    }
}
