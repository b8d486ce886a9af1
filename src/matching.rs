//! Matching loop - sweeps the opposing side in price-time priority.
//!
//! Matches execute at the resting order's price. Within a level, orders
//! fill strictly head-to-tail; a partial fill leaves the head in place
//! with reduced quantity, and the next match resumes there.

use crate::order_book::OrderBook;
use crate::types::{Price, Qty, Side};

impl OrderBook {
    /// Sweep opposing levels from the best outward until `qty` is
    /// exhausted or `limit` would be violated. Returns the unfilled
    /// remainder.
    pub(crate) fn match_internal(&mut self, aggressor: Side, mut qty: Qty, limit: Price) -> Qty {
        match aggressor {
            Side::Buy => {
                while qty.raw() > 0
                    && self.best_ask.raw() <= limit.raw()
                    && self.best_ask.raw() <= self.max_price
                {
                    let price = self.best_ask;
                    qty = self.match_level(price, qty);
                    if self.levels[price.raw() as usize].is_empty() {
                        self.update_best_ask();
                    }
                }
            }
            Side::Sell => {
                while qty.raw() > 0
                    && self.best_bid.raw() >= limit.raw()
                    && self.best_bid.raw() >= 0
                {
                    let price = self.best_bid;
                    qty = self.match_level(price, qty);
                    if self.levels[price.raw() as usize].is_empty() {
                        self.update_best_bid();
                    }
                }
            }
        }
        qty
    }

    /// Fill against one level's FIFO queue until `qty` is exhausted or the
    /// level empties.
    fn match_level(&mut self, price: Price, mut qty: Qty) -> Qty {
        let px = price.raw() as usize;

        while qty.raw() > 0 && !self.levels[px].is_empty() {
            let head = self.levels[px].front();

            let fill = qty.min(self.arena.get(head).qty);
            self.arena.get_mut(head).fill(fill);
            qty -= fill;
            self.levels[px].reduce_qty(fill);

            if self.arena.get(head).filled() {
                self.remove_from_book(head);
            }
        }

        qty
    }

    /// Scan downward from the stale best bid to the next populated level,
    /// terminating at `NO_BID` when no bids remain.
    ///
    /// Only levels between the old best and the next populated one are
    /// touched; empty levels are a single load each.
    pub(crate) fn update_best_bid(&mut self) {
        let mut px = self.best_bid.raw();
        while px >= 0 && self.levels[px as usize].is_empty() {
            px -= 1;
        }
        self.best_bid = Price::new(px);
    }

    /// Scan upward symmetrically, terminating at `max_price + 1`.
    pub(crate) fn update_best_ask(&mut self) {
        let mut px = self.best_ask.raw();
        while px <= self.max_price && self.levels[px as usize].is_empty() {
            px += 1;
        }
        self.best_ask = Price::new(px);
    }
}
