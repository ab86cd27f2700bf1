//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    6897 / 1.18 = 5844.915254237288  (and it only gets worse)           │
//! │                                                                         │
//! │  The catalog prices every product in whole rupees, so we keep every    │
//! │  amount as an integer and round exactly once, at the point where a     │
//! │  fraction appears (the tax back-calculation).                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kosmetics_core::money::Money;
//!
//! let price = Money::from_rupees(2499);
//!
//! let doubled = price * 2;                       // ₹4998
//! let total = price + Money::from_rupees(50);    // ₹2549
//! assert_eq!(total.rupees(), 2549);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Indian rupees.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate values (e.g. subtotal − discount) may dip
///   below zero before the pricing engine clamps them
/// - **Single field tuple struct**: serializes as a bare number, which is
///   what the storefront frontend already sends and renders
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product price ──► CartLineItem.unit_price ──► line total               │
/// │                                                                         │
/// │  Σ line totals ──► inclusive subtotal ──┬──► tax (back-computed)        │
/// │                                         ├──► shipping                   │
/// │                                         └──► total ──► payment step     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use kosmetics_core::money::Money;
    ///
    /// let price = Money::from_rupees(1899);
    /// assert_eq!(price.rupees(), 1899);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees)
    }

    /// Returns the value in rupees.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero if it is negative.
    ///
    /// ## Example
    /// ```rust
    /// use kosmetics_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(-20).non_negative(), Money::zero());
    /// assert_eq!(Money::from_rupees(20).non_negative().rupees(), 20);
    /// ```
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use kosmetics_core::money::Money;
    ///
    /// let line_total = Money::from_rupees(2499).multiply_quantity(2);
    /// assert_eq!(line_total.rupees(), 4998);
    ///
    /// let huge = Money::from_rupees(i64::MAX / 2 + 1).multiply_quantity(2);
    /// assert_eq!(huge.rupees(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Extracts the tax already contained in a tax-inclusive amount.
    ///
    /// Catalog prices include GST, so the tax is backed out rather than
    /// added on top:
    ///
    /// ```text
    ///   tax = round(amount − amount / (1 + rate))
    ///       = round(amount × bps / (10000 + bps))
    /// ```
    ///
    /// Rounding is half-up (toward positive infinity), matching what the
    /// storefront has always displayed. The division is exact integer math
    /// in `i128`, so no float error creeps into the rounding decision.
    ///
    /// ## Example
    /// ```rust
    /// use kosmetics_core::money::Money;
    /// use kosmetics_core::types::TaxRate;
    ///
    /// let inclusive = Money::from_rupees(200);
    /// // 200 − 200 / 1.18 = 30.51 → 31
    /// assert_eq!(inclusive.included_tax(TaxRate::from_bps(1800)).rupees(), 31);
    /// ```
    pub fn included_tax(&self, rate: TaxRate) -> Money {
        if rate.is_zero() {
            return Money::zero();
        }

        let numerator = self.0 as i128 * rate.bps() as i128;
        let denominator = 10_000 + rate.bps() as i128;

        // floor(n/d + 1/2) == floor((2n + d) / 2d)
        let rounded = (2 * numerator + denominator).div_euclid(2 * denominator);
        Money(rounded as i64)
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        Ord::min(self, other)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rupee display (`₹2499`, `-₹50`).
///
/// The frontend does its own locale formatting; this is for logs and
/// email bodies.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-₹{}", self.0.unsigned_abs())
        } else {
            write!(f, "₹{}", self.0)
        }
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

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
