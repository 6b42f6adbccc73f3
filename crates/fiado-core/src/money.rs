//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  WRONG!                          │
//! │                                                                     │
//! │  In a collections ledger that drift is worse than cosmetic: a       │
//! │  balance of 0.0000000001 keeps a settled sale on the overdue list.  │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    $9,000.00 / 17 = 52941 cents, rounded half-up exactly once.      │
//! │    paid_off is balance == 0, no epsilon required.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiado_core::money::{DownPaymentRate, Money};
//!
//! let total = Money::from_cents(1_000_000); // $10,000.00
//! let down = total.apply_rate(DownPaymentRate::from_bps(1000)); // 10%
//! assert_eq!(down.cents(), 100_000); // $1,000.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate subtraction may dip negative before
///   validation rejects it; the ledger itself never stores a negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (pesos and centavos).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
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

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
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

    /// Applies a basis-point rate with half-up rounding to whole cents.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// the half-up rounding (5000/10000 = 0.5). i128 prevents overflow on
    /// large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::{DownPaymentRate, Money};
    ///
    /// let total = Money::from_cents(1_000_000); // $10,000.00
    /// let rate = DownPaymentRate::from_bps(1000); // 10%
    /// assert_eq!(total.apply_rate(rate).cents(), 100_000); // $1,000.00
    /// ```
    pub fn apply_rate(&self, rate: DownPaymentRate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Divides into `n` equal installments, rounded half-up to whole cents.
    ///
    /// Rounding happens exactly here, at the point the stored installment
    /// amount is produced. Callers must not re-divide or re-round.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let balance = Money::from_cents(900_000); // $9,000.00
    /// // 900000 / 17 = 52941.17... -> $529.41
    /// assert_eq!(balance.split_installments(17).cents(), 52941);
    /// ```
    pub fn split_installments(&self, n: u32) -> Money {
        debug_assert!(n > 0, "installment count validated upstream");
        let n = n as i128;
        let cents = (self.0 as i128 * 2 + n) / (n * 2);
        Money::from_cents(cents as i64)
    }

    /// Multiplies money by a quantity (line totals).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

}

// =============================================================================
// Down Payment Rate
// =============================================================================

/// Down-payment rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%, the observed store default for credit sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownPaymentRate(u32);

impl DownPaymentRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DownPaymentRate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        DownPaymentRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// A rate is only meaningful below 100%: a down payment equal to the
    /// total is not a credit sale.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 < 10000
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Receipt/statement rendering formats
/// amounts on its own side to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_apply_rate_exact() {
        // $10,000.00 at 10% = $1,000.00
        let total = Money::from_cents(1_000_000);
        let down = total.apply_rate(DownPaymentRate::from_bps(1000));
        assert_eq!(down.cents(), 100_000);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // $0.25 at 10% = 2.5 cents -> 3 cents
        let amount = Money::from_cents(25);
        let down = amount.apply_rate(DownPaymentRate::from_bps(1000));
        assert_eq!(down.cents(), 3);
    }

    #[test]
    fn test_split_installments_seventeen_weekly() {
        // $9,000.00 over 17 payments -> $529.41
        let balance = Money::from_cents(900_000);
        assert_eq!(balance.split_installments(17).cents(), 52941);
    }

    #[test]
    fn test_split_installments_rounds_half_up() {
        // 101 cents / 2 = 50.5 -> 51
        assert_eq!(Money::from_cents(101).split_installments(2).cents(), 51);
        // 100 / 3 = 33.33 -> 33
        assert_eq!(Money::from_cents(100).split_installments(3).cents(), 33);
    }

    #[test]
    fn test_rate_validity() {
        assert!(DownPaymentRate::from_bps(0).is_valid());
        assert!(DownPaymentRate::from_bps(9999).is_valid());
        assert!(!DownPaymentRate::from_bps(10000).is_valid());
    }

    #[test]
    fn test_rate_from_percentage() {
        let rate = DownPaymentRate::from_percentage(10.0);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_sum() {
        let payments = vec![Money::from_cents(100), Money::from_cents(250)];
        let total: Money = payments.into_iter().sum();
        assert_eq!(total.cents(), 350);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
