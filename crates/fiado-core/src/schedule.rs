//! # Amortization Calculator
//!
//! Derives the schedule terms of a credit sale from its principal and
//! term parameters: down payment, opening balance, per-interval payment.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Sale creation (once per sale)                                      │
//! │                                                                     │
//! │  total = $10,000.00, rate = 10%, n = 17                             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  compute_schedule() ── down    = $1,000.00                          │
//! │                     ── balance = $9,000.00                          │
//! │                     ── installment = $529.41  (9000/17, half-up)    │
//! │                                                                     │
//! │  The stored values are final: the payment ledger only ever          │
//! │  subtracts from `balance`, it never re-derives the schedule.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding happens exactly once per stored value (inside [`Money`]'s
//! rate/division helpers), never on intermediates, so repeated reads can
//! not drift.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{DownPaymentRate, Money};

/// The derived terms of a credit schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    /// Upfront portion collected at sale time.
    pub down_payment: Money,
    /// Opening balance: total minus down payment.
    pub balance: Money,
    /// Per-interval payment amount (balance / term, half-up).
    pub installment: Money,
}

impl PaymentSchedule {
    /// True when the schedule leaves nothing to collect (the operator's
    /// down payment covered the whole total).
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.balance.is_zero()
    }
}

/// Computes a schedule from a rate-derived down payment.
///
/// ## Contract
/// - `total > 0`
/// - `rate` in [0%, 100%) - a 100% "down payment" is not a credit sale
/// - `number_of_payments >= 1`
///
/// ## Example
/// ```rust
/// use fiado_core::money::{DownPaymentRate, Money};
/// use fiado_core::schedule::compute_schedule;
///
/// let s = compute_schedule(
///     Money::from_cents(1_000_000),
///     DownPaymentRate::from_bps(1000),
///     17,
/// )
/// .unwrap();
/// assert_eq!(s.down_payment.cents(), 100_000);
/// assert_eq!(s.balance.cents(), 900_000);
/// assert_eq!(s.installment.cents(), 52_941);
/// ```
pub fn compute_schedule(
    total: Money,
    rate: DownPaymentRate,
    number_of_payments: u32,
) -> CoreResult<PaymentSchedule> {
    if !total.is_positive() {
        return Err(CoreError::InvalidScheduleParameters {
            reason: format!("total amount must be positive, got {}", total),
        });
    }
    if !rate.is_valid() {
        return Err(CoreError::InvalidScheduleParameters {
            reason: format!(
                "down payment rate must be below 100%, got {} bps",
                rate.bps()
            ),
        });
    }
    if number_of_payments == 0 {
        return Err(CoreError::InvalidScheduleParameters {
            reason: "number of payments must be at least 1".to_string(),
        });
    }

    let down_payment = total.apply_rate(rate);
    let balance = total - down_payment;
    let installment = balance.split_installments(number_of_payments);

    Ok(PaymentSchedule {
        down_payment,
        balance,
        installment,
    })
}

/// Computes a schedule from an operator-entered down payment amount.
///
/// Used when the cashier types a custom down payment at sale time
/// instead of taking the rate-derived default. A down payment at or
/// above the total settles the sale at creation: balance 0,
/// installment 0, and the recorded down payment is capped at the total
/// so the ledger identity `balance == total - down_payment - paid`
/// holds from day one.
pub fn compute_schedule_with_down_payment(
    total: Money,
    down_payment: Money,
    number_of_payments: u32,
) -> CoreResult<PaymentSchedule> {
    if !total.is_positive() {
        return Err(CoreError::InvalidScheduleParameters {
            reason: format!("total amount must be positive, got {}", total),
        });
    }
    if down_payment.is_negative() {
        return Err(CoreError::InvalidScheduleParameters {
            reason: format!("down payment cannot be negative, got {}", down_payment),
        });
    }
    if number_of_payments == 0 {
        return Err(CoreError::InvalidScheduleParameters {
            reason: "number of payments must be at least 1".to_string(),
        });
    }

    // Store at most the total. The ledger identity
    // `balance == total - down_payment - paid` holds for every sale,
    // so an overshooting cash amount is recorded as exactly the total;
    // the excess is change handed back, not part of the sale.
    let down_payment = if down_payment.cents() > total.cents() {
        total
    } else {
        down_payment
    };

    let balance = total - down_payment;
    let installment = if balance.is_zero() {
        Money::zero()
    } else {
        balance.split_installments(number_of_payments)
    };

    Ok(PaymentSchedule {
        down_payment,
        balance,
        installment,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_thousand_at_ten_pct_over_seventeen() {
        let s = compute_schedule(
            Money::from_cents(1_000_000),
            DownPaymentRate::from_bps(1000),
            17,
        )
        .unwrap();

        assert_eq!(s.down_payment.cents(), 100_000); // $1,000.00
        assert_eq!(s.balance.cents(), 900_000); // $9,000.00
        assert_eq!(s.installment.cents(), 52_941); // $529.41
        assert!(!s.is_settled());
    }

    #[test]
    fn test_zero_rate() {
        let s = compute_schedule(Money::from_cents(1700), DownPaymentRate::from_bps(0), 17).unwrap();
        assert_eq!(s.down_payment.cents(), 0);
        assert_eq!(s.balance.cents(), 1700);
        assert_eq!(s.installment.cents(), 100);
    }

    #[test]
    fn test_rejects_non_positive_total() {
        let err = compute_schedule(Money::zero(), DownPaymentRate::from_bps(1000), 17);
        assert!(matches!(
            err,
            Err(CoreError::InvalidScheduleParameters { .. })
        ));

        let err = compute_schedule(
            Money::from_cents(-100),
            DownPaymentRate::from_bps(1000),
            17,
        );
        assert!(matches!(
            err,
            Err(CoreError::InvalidScheduleParameters { .. })
        ));
    }

    #[test]
    fn test_rejects_rate_at_or_above_100_pct() {
        let err = compute_schedule(
            Money::from_cents(1000),
            DownPaymentRate::from_bps(10000),
            17,
        );
        assert!(matches!(
            err,
            Err(CoreError::InvalidScheduleParameters { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_term() {
        let err = compute_schedule(Money::from_cents(1000), DownPaymentRate::from_bps(1000), 0);
        assert!(matches!(
            err,
            Err(CoreError::InvalidScheduleParameters { .. })
        ));
    }

    #[test]
    fn test_custom_down_payment() {
        let s = compute_schedule_with_down_payment(
            Money::from_cents(100_000),
            Money::from_cents(25_000),
            10,
        )
        .unwrap();
        assert_eq!(s.balance.cents(), 75_000);
        assert_eq!(s.installment.cents(), 7_500);
    }

    #[test]
    fn test_custom_down_payment_covering_total_settles_sale() {
        // Paying the whole total up front: nothing left to amortize.
        let s = compute_schedule_with_down_payment(
            Money::from_cents(50_000),
            Money::from_cents(50_000),
            17,
        )
        .unwrap();
        assert!(s.is_settled());
        assert_eq!(s.installment.cents(), 0);

        // Over the total clamps to zero as well.
        let s = compute_schedule_with_down_payment(
            Money::from_cents(50_000),
            Money::from_cents(60_000),
            17,
        )
        .unwrap();
        assert_eq!(s.balance.cents(), 0);
        assert_eq!(s.installment.cents(), 0);
    }

    #[test]
    fn test_overshooting_down_payment_recorded_as_total() {
        // The stored down payment is capped at the total, keeping
        // `balance == total - down_payment` exact. The change handed
        // back at the counter is not part of the sale.
        let s = compute_schedule_with_down_payment(
            Money::from_cents(50_000),
            Money::from_cents(60_000),
            17,
        )
        .unwrap();
        assert_eq!(s.down_payment.cents(), 50_000);
        assert_eq!(s.balance.cents(), 0);
    }

    #[test]
    fn test_custom_down_payment_rejects_negative() {
        let err = compute_schedule_with_down_payment(
            Money::from_cents(50_000),
            Money::from_cents(-1),
            17,
        );
        assert!(matches!(
            err,
            Err(CoreError::InvalidScheduleParameters { .. })
        ));
    }

    #[test]
    fn test_installment_rounding_is_single_point() {
        // 1000 cents over 3 payments: 333.33 -> 333. The stored value is
        // what every later read returns; no recomputation can disagree.
        let s = compute_schedule(Money::from_cents(1000), DownPaymentRate::from_bps(0), 3).unwrap();
        assert_eq!(s.installment.cents(), 333);
    }
}
