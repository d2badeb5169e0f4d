//! # Money Module
//!
//! Provides the `Money` type for fares and ticket prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Fare 12.10 stored as f32, times 3 seats:                              │
//! │    36.299999 → rounds differently depending on who prints it  ❌       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1210 cents × 3 = 3630 cents, exactly, every time                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rail_core::money::Money;
//!
//! let fare = Money::from_cents(1210); // 12.10 €
//! let ticket_price = fare * 3;        // 36.30 €
//! assert_eq!(ticket_price.cents(), 3630);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (euro cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Differences (refund amounts) can go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **sqlx transparent**: Stored as a plain INTEGER column
///
/// ## Where Money is Used
/// ```text
/// Trip.price_per_seat ──► fare_for(seats) ──► Ticket.price
///                                                  │
///                      partial cancel ◄────────────┘
///                      price_after_release(seats)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use rail_core::money::Money;
    ///
    /// let fare = Money::from_cents(1099); // 10.99 €
    /// assert_eq!(fare.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from euros and cents.
    ///
    /// ## Example
    /// ```rust
    /// use rail_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-euro portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a per-seat fare by a seat count.
    ///
    /// ## Example
    /// ```rust
    /// use rail_core::money::Money;
    ///
    /// let fare = Money::from_cents(1250);
    /// assert_eq!(fare.multiply_quantity(4).cents(), 5000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Splits a total evenly over `qty` units, truncating toward zero.
    ///
    /// A ticket's price is always `fare * quantity`, so for ticket prices the
    /// split is exact. Returns zero for a zero quantity.
    ///
    /// ## Example
    /// ```rust
    /// use rail_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(3750).per_unit(3).cents(), 1250);
    /// ```
    #[inline]
    pub const fn per_unit(&self, qty: i64) -> Self {
        if qty == 0 {
            Money(0)
        } else {
            Money(self.0 / qty)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows euros with two decimals, e.g. `12.50 €`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02} €", sign, self.euros().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a seat count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
