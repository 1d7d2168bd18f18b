//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and
//! `DiscountRate` for per-item percentage discounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers: 1999.9, 0.1, 15000          │
//! │  Summing them as floats drifts:                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    JSON number ──► round once at the boundary ──► i64 cents            │
//! │    Every sum, product and discount after that is exact integer math    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vitrina_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(10_000); // $100.00
//! let line = price * 2;                  // $200.00
//! let discount = line.percentage(DiscountRate::from_percentage(10.0));
//! assert_eq!(discount.cents(), 2_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;
use crate::MAX_DISCOUNT_PERCENT;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for exchange differences
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: serialized as cents inside local storage; use
///   [`major_units`] for API payloads that carry decimal numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use vitrina_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount in major units.
    ///
    /// Only used at the API boundary, where the backend sends prices as
    /// JSON numbers. Rounds half away from zero to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use vitrina_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1999.9).cents(), 199_990);
    /// assert_eq!(Money::from_major(0.125).cents(), 13);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the amount in major units, for API payloads.
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
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
    /// ## Example
    /// ```rust
    /// use vitrina_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Returns `rate` percent of this amount, rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## User Workflow
    /// ```text
    /// Line: Remera $100.00 × 2, discount 10%
    ///      │
    ///      ▼
    /// percentage(10%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line discount: $20.00
    /// ```
    pub fn percentage(&self, rate: DiscountRate) -> Money {
        // i128 so large carts cannot overflow the intermediate product
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000).div_euclid(10000);
        Money(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Subtracts without going below zero.
    #[inline]
    pub fn saturating_sub_floor_zero(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

/// Display shows money in a human-readable format.
///
/// ## Note
/// Intended for the terminal only; amounts sent to the API go through
/// [`Money::to_major`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.units().abs(), self.cents_part())
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
        self.0 = self.0.saturating_add(other.0);
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
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// API Boundary Serialization
// =============================================================================

/// Serde adapter for API payloads that carry money as decimal numbers.
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Product {
///     #[serde(with = "vitrina_core::money::major_units")]
///     price: Money,
/// }
/// ```
pub mod major_units {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_major())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_major(amount))
    }

    /// Same adapter for optional amounts (`null` or missing → `None`).
    pub mod option {
        use super::Money;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&m.to_major()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            Ok(Option::<f64>::deserialize(deserializer)?.map(Money::from_major))
        }
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Per-item discount represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so `12.5%` is stored exactly as `1250`.
/// On the wire the rate is a plain percentage number (`10` = 10%),
/// which is what the backend stores on products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a percentage, clamped to `[0, 100]`.
    pub fn from_percentage(pct: f64) -> Self {
        let pct = pct.clamp(0.0, MAX_DISCOUNT_PERCENT as f64);
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display and API payloads).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// No discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<f64> for DiscountRate {
    type Error = ValidationError;

    fn try_from(pct: f64) -> Result<Self, Self::Error> {
        if !pct.is_finite() || pct < 0.0 || pct > MAX_DISCOUNT_PERCENT as f64 {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: MAX_DISCOUNT_PERCENT as i64,
            });
        }
        Ok(DiscountRate::from_percentage(pct))
    }
}

impl From<DiscountRate> for f64 {
    fn from(rate: DiscountRate) -> Self {
        rate.percentage()
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{:.2}%", self.percentage())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
