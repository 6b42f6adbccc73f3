//! # Payment Ledger
//!
//! Applies payments against a sale's balance, enforcing validity and
//! recomputing aggregate state.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  register_payment(sale, $300, Cash)                                 │
//! │       │                                                             │
//! │       ├── amount <= 0?            → InvalidPaymentAmount            │
//! │       ├── sale already settled?   → SaleAlreadyPaid                 │
//! │       ├── amount > balance_due?   → PaymentExceedsBalance           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  (updated Sale, new Payment)                                        │
//! │   balance_due -= amount                                             │
//! │   status = PaidOff when balance hits exactly 0                      │
//! │   version += 1                                                      │
//! │                                                                     │
//! │  The storage layer persists both in ONE transaction, with the       │
//! │  sale update conditional on the version this function read.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is pure: it computes the next ledger state and hands it
//! back. Durability, locking and retries belong to fiado-db and
//! fiado-service.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Payment, PaymentMethod, Sale, SaleStatus};

/// Validates and applies a payment, returning the updated sale and the
/// new payment record.
///
/// `paid_at` is the server-assigned timestamp (the service layer passes
/// `Utc::now()`); callers never supply it, which keeps the ledger's
/// insertion order chronological and rules out backdating.
///
/// The input sale is untouched on every error path: a rejected payment
/// mutates nothing.
pub fn register_payment(
    sale: &Sale,
    amount: Money,
    method: PaymentMethod,
    notes: Option<String>,
    paid_at: DateTime<Utc>,
) -> CoreResult<(Sale, Payment)> {
    if !amount.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            reason: format!("must be positive, got {}", amount),
        });
    }

    if sale.status == SaleStatus::PaidOff || sale.balance_due_cents == 0 {
        return Err(CoreError::SaleAlreadyPaid(sale.id.clone()));
    }

    if amount.cents() > sale.balance_due_cents {
        return Err(CoreError::PaymentExceedsBalance {
            sale_id: sale.id.clone(),
            amount_cents: amount.cents(),
            balance_cents: sale.balance_due_cents,
        });
    }

    let new_balance = sale.balance_due_cents - amount.cents();

    let mut updated = sale.clone();
    updated.balance_due_cents = new_balance;
    updated.status = if new_balance == 0 {
        SaleStatus::PaidOff
    } else {
        SaleStatus::Active
    };
    updated.updated_at = paid_at;
    updated.version = sale.version + 1;

    let payment = Payment {
        id: Uuid::new_v4().to_string(),
        sale_id: sale.id.clone(),
        amount_cents: amount.cents(),
        method,
        notes,
        paid_at,
    };

    Ok((updated, payment))
}

/// Checks the ledger invariant:
/// `balance_due == total - down_payment - sum(payments)` and `>= 0`.
///
/// Statements and reports recompute through this instead of trusting any
/// separately tracked aggregate.
pub fn balance_matches_ledger(sale: &Sale, payments: &[Payment]) -> bool {
    let paid: i64 = payments.iter().map(|p| p.amount_cents).sum();
    sale.balance_due_cents >= 0
        && sale.balance_due_cents == sale.total_cents - sale.down_payment_cents - paid
}

/// Sum of all payment amounts on a sale's ledger.
pub fn total_paid(payments: &[Payment]) -> Money {
    payments.iter().map(|p| p.amount()).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentInterval;
    use chrono::TimeZone;

    fn credit_sale(balance_cents: i64) -> Sale {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Sale {
            id: "sale-1".to_string(),
            client_id: "client-1".to_string(),
            status: if balance_cents == 0 {
                SaleStatus::PaidOff
            } else {
                SaleStatus::Active
            },
            total_cents: balance_cents + 10_000,
            is_credit: true,
            down_payment_cents: 10_000,
            balance_due_cents: balance_cents,
            number_of_payments: 17,
            installment_cents: 5_000,
            interest_rate_bps: 0,
            interval: PaymentInterval::Weekly,
            notes: None,
            sale_date: created,
            updated_at: created,
            version: 0,
        }
    }

    #[test]
    fn test_payment_reduces_balance() {
        let sale = credit_sale(50_000);
        let (updated, payment) = register_payment(
            &sale,
            Money::from_cents(30_000),
            PaymentMethod::Cash,
            None,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(updated.balance_due_cents, 20_000);
        assert_eq!(updated.status, SaleStatus::Active);
        assert_eq!(updated.version, 1);
        assert_eq!(payment.amount_cents, 30_000);
        assert_eq!(payment.sale_id, sale.id);
    }

    #[test]
    fn test_exact_payoff_transitions_status() {
        // balance 500.00, pay 500.00 -> balance 0.00, paid_off
        let sale = credit_sale(50_000);
        let (updated, _) = register_payment(
            &sale,
            Money::from_cents(50_000),
            PaymentMethod::Transfer,
            None,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(updated.balance_due_cents, 0);
        assert_eq!(updated.status, SaleStatus::PaidOff);
    }

    #[test]
    fn test_overpayment_rejected_without_mutation() {
        // balance 500.00, pay 600.00 -> rejected, balance unchanged
        let sale = credit_sale(50_000);
        let err = register_payment(
            &sale,
            Money::from_cents(60_000),
            PaymentMethod::Cash,
            None,
            Utc::now(),
        );

        assert!(matches!(
            err,
            Err(CoreError::PaymentExceedsBalance {
                amount_cents: 60_000,
                balance_cents: 50_000,
                ..
            })
        ));
        assert_eq!(sale.balance_due_cents, 50_000);
        assert_eq!(sale.version, 0);
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        let sale = credit_sale(50_000);
        assert!(matches!(
            register_payment(&sale, Money::zero(), PaymentMethod::Cash, None, Utc::now()),
            Err(CoreError::InvalidPaymentAmount { .. })
        ));
        assert!(matches!(
            register_payment(
                &sale,
                Money::from_cents(-100),
                PaymentMethod::Cash,
                None,
                Utc::now()
            ),
            Err(CoreError::InvalidPaymentAmount { .. })
        ));
    }

    #[test]
    fn test_settled_sale_rejects_payments() {
        let sale = credit_sale(0);
        let err = register_payment(
            &sale,
            Money::from_cents(100),
            PaymentMethod::Cash,
            None,
            Utc::now(),
        );
        assert!(matches!(err, Err(CoreError::SaleAlreadyPaid(_))));
    }

    #[test]
    fn test_status_never_paid_off_before_full_collection() {
        let mut sale = credit_sale(50_000);
        // Pay everything except one cent across several payments.
        for amount in [20_000, 20_000, 9_999] {
            let (updated, _) = register_payment(
                &sale,
                Money::from_cents(amount),
                PaymentMethod::Cash,
                None,
                Utc::now(),
            )
            .unwrap();
            sale = updated;
            assert_eq!(sale.status, SaleStatus::Active);
        }
        assert_eq!(sale.balance_due_cents, 1);

        let (updated, _) = register_payment(
            &sale,
            Money::from_cents(1),
            PaymentMethod::Cash,
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(updated.status, SaleStatus::PaidOff);
    }

    #[test]
    fn test_balance_matches_ledger() {
        let mut sale = credit_sale(50_000);
        let mut payments = Vec::new();
        assert!(balance_matches_ledger(&sale, &payments));

        let (updated, payment) = register_payment(
            &sale,
            Money::from_cents(12_345),
            PaymentMethod::Card,
            None,
            Utc::now(),
        )
        .unwrap();
        sale = updated;
        payments.push(payment);

        assert!(balance_matches_ledger(&sale, &payments));
        assert_eq!(total_paid(&payments).cents(), 12_345);

        // A drifted balance is detected.
        sale.balance_due_cents += 1;
        assert!(!balance_matches_ledger(&sale, &payments));
    }
}
