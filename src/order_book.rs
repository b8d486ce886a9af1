//! Order book - the array-indexed central limit order book.
//!
//! One `PriceLevel` per integer tick in `0..=max_price`, a fixed-capacity
//! arena for order storage, a direct-mapped id index, and cached best
//! bid/ask. All public operations are O(1) in the common case; the only
//! scan is best-price advancement across empty levels.

use crate::arena::{Arena, ArenaIndex, Order};
use crate::order_index::OrderIndex;
use crate::price_level::PriceLevel;
use crate::types::{OrdType, OrderId, Price, Qty, Side, Timestamp, NO_BID};

/// Outcome of an `add` call.
///
/// Every non-`Ok` variant leaves the book untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum AddResult {
    Ok,
    DuplicateId,
    InvalidPrice,
    InvalidQty,
    PoolExhausted,
}

impl AddResult {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == AddResult::Ok
    }
}

/// Single-instrument limit order book.
///
/// Owns the price-level directory, the order arena, the id index, and the
/// best-price pair; they are mutated only in lockstep through the public
/// operations. One instance per instrument, one thread per instance.
pub struct OrderBook {
    pub(crate) levels: Vec<PriceLevel>,
    pub(crate) best_bid: Price,
    pub(crate) best_ask: Price,
    pub(crate) total_orders: usize,
    pub(crate) arena: Arena,
    pub(crate) index: OrderIndex,
    pub(crate) max_price: i64,
}

impl OrderBook {
    /// Create a book covering prices `0..=max_price` with room for
    /// `max_orders` resting orders.
    ///
    /// # Panics
    /// Panics if `max_price < 0` or `max_orders == 0`.
    pub fn new(max_price: i64, max_orders: u32) -> Self {
        assert!(max_price >= 0, "max_price must be non-negative");

        Self {
            levels: vec![PriceLevel::new(); (max_price + 1) as usize],
            best_bid: NO_BID,
            best_ask: Price::new(max_price + 1),
            total_orders: 0,
            arena: Arena::new(max_orders),
            index: OrderIndex::new(max_orders as usize),
            max_price,
        }
    }

    /// Submit an order.
    ///
    /// Preconditions are checked in order (duplicate id, quantity, price)
    /// and the first failure is returned without mutating anything. A
    /// crossing order matches against the opposing side first, capped at
    /// its own price; IOC and Market orders never rest, and a fully
    /// matched remainder never rests. A resting order records the
    /// post-crossing remainder as its original quantity.
    pub fn add(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        qty: Qty,
        ord_type: OrdType,
        ts: Timestamp,
    ) -> AddResult {
        if self.index.lookup(&self.arena, id).is_some() {
            return AddResult::DuplicateId;
        }
        if qty.raw() <= 0 {
            return AddResult::InvalidQty;
        }
        if price.raw() < 0 || price.raw() > self.max_price {
            return AddResult::InvalidPrice;
        }

        // match if crossing
        let mut remaining = qty;
        match side {
            Side::Buy => {
                if price >= self.best_ask {
                    remaining = self.match_internal(side, remaining, price);
                }
            }
            Side::Sell => {
                if price <= self.best_bid {
                    remaining = self.match_internal(side, remaining, price);
                }
            }
        }

        // ioc/market never rest
        if matches!(ord_type, OrdType::IOC | OrdType::Market) {
            return AddResult::Ok;
        }

        // fully matched on entry
        if remaining.raw() <= 0 {
            return AddResult::Ok;
        }

        let slot = match self.arena.acquire() {
            Some(slot) => slot,
            None => return AddResult::PoolExhausted,
        };

        *self.arena.get_mut(slot) = Order::new(id, price, remaining, side, ord_type, ts);

        if !self.index.insert(&self.arena, slot) {
            self.arena.release(slot);
            return AddResult::DuplicateId;
        }

        self.levels[price.raw() as usize].push_back(&mut self.arena, slot);
        self.total_orders += 1;

        match side {
            Side::Buy => {
                if price > self.best_bid {
                    self.best_bid = price;
                }
            }
            Side::Sell => {
                if price < self.best_ask {
                    self.best_ask = price;
                }
            }
        }

        AddResult::Ok
    }

    /// `add` with the default order type and timestamp.
    #[inline]
    pub fn add_limit(&mut self, id: OrderId, side: Side, price: Price, qty: Qty) -> AddResult {
        self.add(id, side, price, qty, OrdType::Limit, Timestamp::new(0))
    }

    /// Cancel a resting order. Returns `false` if the id is unknown.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        let slot = match self.index.lookup(&self.arena, id) {
            Some(slot) => slot,
            None => return false,
        };

        let order = self.arena.get(slot);
        let price = order.price;
        let side = order.side;

        self.remove_from_book(slot);

        // advance the best only if the cancel hit it
        match side {
            Side::Buy => {
                if price == self.best_bid {
                    self.update_best_bid();
                }
            }
            Side::Sell => {
                if price == self.best_ask {
                    self.update_best_ask();
                }
            }
        }

        true
    }

    /// Market sweep with no price cap.
    ///
    /// Returns the quantity left unfilled once opposing liquidity is
    /// exhausted.
    pub fn match_market(&mut self, aggressor: Side, qty: Qty) -> Qty {
        let limit = match aggressor {
            Side::Buy => Price::new(self.max_price),
            Side::Sell => Price::new(0),
        };
        self.match_internal(aggressor, qty, limit)
    }

    /// Unlink an order from its level, the index, and the arena.
    pub(crate) fn remove_from_book(&mut self, slot: ArenaIndex) {
        let order = self.arena.get(slot);
        let id = order.id;
        let price = order.price;

        self.levels[price.raw() as usize].remove(&mut self.arena, slot);
        self.index.remove(&self.arena, id);
        self.arena.release(slot);
        self.total_orders -= 1;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Best bid, or `NO_BID` when no bids rest.
    #[inline]
    pub fn bid(&self) -> Price {
        self.best_bid
    }

    /// Best ask, or `max_price + 1` when no asks rest.
    #[inline]
    pub fn ask(&self) -> Price {
        self.best_ask
    }

    /// Aggregate resting quantity at the best bid, 0 when absent.
    #[inline]
    pub fn bid_qty(&self) -> Qty {
        if self.best_bid.raw() < 0 {
            return Qty::new(0);
        }
        self.levels[self.best_bid.raw() as usize].qty()
    }

    /// Aggregate resting quantity at the best ask, 0 when absent.
    #[inline]
    pub fn ask_qty(&self) -> Qty {
        if self.best_ask.raw() > self.max_price {
            return Qty::new(0);
        }
        self.levels[self.best_ask.raw() as usize].qty()
    }

    /// `ask - bid`; meaningful only when both sides are present.
    #[inline]
    pub fn spread(&self) -> Price {
        self.best_ask - self.best_bid
    }

    #[inline]
    pub fn has_bid(&self) -> bool {
        self.best_bid.raw() >= 0
    }

    #[inline]
    pub fn has_ask(&self) -> bool {
        self.best_ask.raw() <= self.max_price
    }

    /// Self-check accessor; always `false` between public calls.
    #[inline]
    pub fn crossed(&self) -> bool {
        self.has_bid() && self.has_ask() && self.best_bid >= self.best_ask
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.total_orders
    }

    #[inline]
    pub fn pool_used(&self) -> usize {
        self.arena.used() as usize
    }

    #[inline]
    pub fn pool_capacity(&self) -> usize {
        self.arena.capacity() as usize
    }

    /// Read-only view of a resting order.
    #[inline]
    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.index
            .lookup(&self.arena, id)
            .map(|slot| self.arena.get(slot))
    }

    /// Read-only view of the level at `price`.
    ///
    /// # Panics
    /// Panics if `price` is outside `0..=max_price`.
    #[inline]
    pub fn level_at(&self, price: Price) -> &PriceLevel {
        &self.levels[price.raw() as usize]
    }

    #[inline]
    pub fn max_price(&self) -> i64 {
        self.max_price
    }

    #[inline]
    pub fn max_orders(&self) -> u32 {
        self.arena.capacity()
    }

    /// Pre-fault the arena's pages ahead of latency measurement.
    pub fn warm_up(&mut self) {
        self.arena.warm_up();
    }
}
