//! Strong scalar types for the book's domain quantities.
//!
//! Each scalar is a zero-cost newtype over its integer representation.
//! Arithmetic is closed within a single tag: a `Price` can be added to a
//! `Price`, never to a `Qty`. Comparisons are total.

use std::fmt;

macro_rules! scalar {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name($inner);

        impl $name {
            #[inline]
            pub const fn new(v: $inner) -> Self {
                Self(v)
            }

            /// The underlying integer value.
            #[inline]
            pub const fn raw(self) -> $inner {
                self.0
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl std::ops::AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl std::ops::SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

scalar!(
    /// External order identifier, assigned by the caller.
    OrderId, u64
);
scalar!(
    /// Price in integer ticks. Valid book prices are `0..=max_price`;
    /// values outside that range serve as empty-side sentinels.
    Price, i64
);
scalar!(
    /// Order quantity. Valid orders carry `qty > 0`; matching reduces it
    /// and treats the order as filled once it reaches zero.
    Qty, i64
);
scalar!(
    /// Opaque caller-supplied monotonic timestamp.
    Timestamp, u64
);

/// Sentinel bid price when no bids rest in the book.
///
/// The ask-side counterpart is `max_price + 1` and therefore lives on the
/// book instance rather than here.
pub const NO_BID: Price = Price::new(-1);

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    #[inline]
    pub const fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

/// Order type determines whether an unfilled remainder rests in the book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum OrdType {
    /// Rests in the book if not fully matched (default).
    #[default]
    Limit = 0,
    /// Sweeps whatever crosses, never rests.
    Market = 1,
    /// Immediate-or-cancel: matches what it can, never rests.
    IOC = 2,
}

// Verify the wrappers stay zero-cost.
const _: () = assert!(std::mem::size_of::<OrderId>() == 8);
const _: () = assert!(std::mem::size_of::<Price>() == 8);
const _: () = assert!(std::mem::size_of::<Qty>() == 8);
const _: () = assert!(std::mem::size_of::<Timestamp>() == 8);
const _: () = assert!(std::mem::size_of::<Side>() == 1);
const _: () = assert!(std::mem::size_of::<OrdType>() == 1);
