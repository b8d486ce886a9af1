//! # Tickbook
//!
//! A single-instrument, single-threaded limit order book engine built for
//! predictable sub-microsecond operation latency.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: one thread owns the book exclusively (no locks)
//! - **O(1) Operations**: add, cancel, and match run in constant time in
//!   the common case; the only scan is best-price advancement across
//!   empty levels
//! - **Cache-Optimized**: 64-byte aligned order records, 32-bit indices
//! - **Arena Allocation**: no heap allocation in the hot path
//!
//! ## Architecture
//!
//! ```text
//! add / cancel / match_market
//!         |
//!   [OrderBook]
//!    |-- levels[0..=max_price]   array-indexed price directory
//!    |-- Arena                   fixed-capacity order storage
//!    |-- OrderIndex              direct-mapped id -> slot lookup
//!    '-- best_bid / best_ask     cached top of book
//! ```

pub mod arena;
pub mod order_book;
pub mod order_index;
pub mod price_level;
pub mod types;

mod matching;

// Re-exports for convenience
pub use arena::{Arena, ArenaIndex, Order, NULL_INDEX};
pub use order_book::{AddResult, OrderBook};
pub use order_index::OrderIndex;
pub use price_level::PriceLevel;
pub use types::{OrdType, OrderId, Price, Qty, Side, Timestamp, NO_BID};
