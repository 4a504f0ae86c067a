//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    72000 × 0.19 = 13679.999999999998  ❌ WRONG!                         │
//! │                                                                         │
//! │  Integer pesos do not help either:                                      │
//! │    333 × 19% = 63.27 → forced to round mid-calculation                 │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    333 × 0.19 = 63.27 exactly, carried unrounded to the total           │
//! │    Display formatting (not this crate) decides how to show it          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::Money;
//!
//! let price = Money::from_units(40_000);      // $40.000 COP
//! let line = price.multiply_quantity(2);       // $80.000
//! let total = line + Money::from_units(500);   // $80.500
//! assert_eq!(total, Money::from_units(80_500));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Basis points in one whole (100%).
const BPS_PER_WHOLE: i64 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the currency's major unit (pesos).
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact base-10 math, negative allowed for change shortfalls
/// - **Single field tuple struct**: zero-cost wrapper, serialized as a decimal string
/// - **No rounding**: every operation here is exact; rounding is a display concern
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.unit_price ──► LineItem.unit_price ──► LineItem.subtotal       │
/// │                                                     │                   │
/// │                              Promotion ──► discount ┤                   │
/// │                                                     ▼                   │
/// │                                   taxable base ──► tax ──► total        │
/// │                                                                         │
/// │  Bill.total ──► Payment Reconciler ──► change ──► Invoice.total        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// let price = Money::from_units(40_000);
    /// assert_eq!(price.amount().to_string(), "40000");
    /// ```
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// let unit_price = Money::from_units(40_000);
    /// assert_eq!(unit_price.multiply_quantity(2), Money::from_units(80_000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Calculates tax on this amount at the given rate. Exact, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use mostrador_core::types::TaxRate;
    ///
    /// let base = Money::from_units(72_000);
    /// let tax = base.calculate_tax(TaxRate::from_bps(1900)); // 19% VAT
    /// assert_eq!(tax, Money::from_units(13_680));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * Decimal::from(rate.bps()) / Decimal::from(BPS_PER_WHOLE))
    }

    /// Returns `percent`% of this amount (percent expressed as 0-100).
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_units(80_000);
    /// assert_eq!(subtotal.percentage(Decimal::from(10)), Money::from_units(8_000));
    /// ```
    pub fn percentage(&self, percent: Decimal) -> Money {
        Money(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// Rounds up to the next multiple of `step` (returns self when already a multiple).
    ///
    /// A non-positive step returns the value unchanged.
    pub fn ceil_to_multiple(&self, step: Money) -> Money {
        if !step.is_positive() {
            return *self;
        }
        Money((self.0 / step.0).ceil() * step.0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation for logs and debugging.
///
/// ## Note
/// Use the host's currency formatting for actual UI display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}${}", sign, self.0.abs().normalize())
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
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
