//! # Money Module
//!
//! Provides the `Money` type for handling taka amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A storefront summing line items, then taking 15% off, then adding      │
//! │  shipping, drifts by fractions of a poisha on every step.               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Poisha (1 taka = 100 poisha)                     │
//! │    Sums are exact. The only rounding happens when a percentage is       │
//! │    taken, exactly once, half away from zero.                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dokan_core::money::Money;
//!
//! let price = Money::from_taka(500);          // Tk 500.00
//! let line = price.multiply_quantity(2);      // Tk 1000.00
//! let discount = line.percentage_of(10);      // Tk 100.00
//! assert_eq!((line - discount).poisha(), 90_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (poisha for BDT).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate differences may be negative; totals are
///   clamped explicitly with [`Money::saturating_sub`]
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as an integer**: the wire format never carries floats
///
/// ## Where Money is Used
/// ```text
/// ProductPrice.effective() ──► LineItem.unit_price ──► LineItem.line_total
///                                                          │
///                         Cart.subtotal ◄──────────────────┘
///                              │
///        DiscountQuote.discount_amount (percentage_of, rounded once)
///                              │
///         PricedOrder.total = max(0, subtotal + shipping − discount)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from poisha (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use dokan_core::money::Money;
    ///
    /// let price = Money::from_poisha(7_000); // Tk 70.00
    /// assert_eq!(price.poisha(), 7_000);
    /// ```
    #[inline]
    pub const fn from_poisha(poisha: i64) -> Self {
        Money(poisha)
    }

    /// Creates a Money value from whole taka.
    #[inline]
    pub const fn from_taka(taka: i64) -> Self {
        Money(taka * 100)
    }

    /// Creates a Money value from taka and poisha parts.
    ///
    /// ## Example
    /// ```rust
    /// use dokan_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).poisha(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).poisha(), -550);
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

    /// Returns the value in poisha.
    #[inline]
    pub const fn poisha(&self) -> i64 {
        self.0
    }

    /// Returns the whole-taka portion.
    #[inline]
    pub const fn taka(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the poisha portion (always 0-99).
    #[inline]
    pub const fn poisha_part(&self) -> i64 {
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

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// Carts cap price and quantity well below the point where this matters;
    /// saturating keeps a bad stored value from panicking a debug build.
    ///
    /// ## Example
    /// ```rust
    /// use dokan_core::money::Money;
    ///
    /// let unit_price = Money::from_poisha(29_950); // Tk 299.50
    /// assert_eq!(unit_price.multiply_quantity(3).poisha(), 89_850);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Takes `percent`% of this amount, rounded half away from zero to the
    /// nearest poisha.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF AWAY FROM ZERO                                          │
    /// │                                                                     │
    /// │  Tk 3.33 × 50% = 166.5 poisha  → 167 poisha                         │
    /// │  -Tk 3.33 × 50% = -166.5 poisha → -167 poisha                       │
    /// │                                                                     │
    /// │  Matches what customers see from `Math.round(x * 100) / 100` on     │
    /// │  positive amounts, without the float.                               │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use dokan_core::money::Money;
    ///
    /// let subtotal = Money::from_taka(1000);
    /// assert_eq!(subtotal.percentage_of(10), Money::from_taka(100));
    /// ```
    pub fn percentage_of(&self, percent: u8) -> Money {
        // i128 so a large cart times 100 cannot overflow
        let scaled = self.0 as i128 * percent as i128;
        let quotient = scaled / 100;
        let remainder = scaled % 100;

        let rounded = if remainder.abs() * 2 >= 100 {
            quotient + scaled.signum()
        } else {
            quotient
        };

        Money(rounded as i64)
    }

    /// Subtracts `other`, clamping the result at zero.
    ///
    /// Used where a negative value is not a valid domain value (order totals).
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount the way the storefront labels shipping tiers,
/// e.g. `Tk 70.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Tk {}.{:02}", sign, self.taka().abs(), self.poisha_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
