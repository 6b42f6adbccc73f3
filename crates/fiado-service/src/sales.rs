//! # Sale Operations
//!
//! Creating sales (cash and credit) and registering payments against
//! the credit ledger.
//!
//! ## Credit Sale Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  NewSale { clientId, items, downPaymentBps: 1000, payments: 17 }    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  price snapshots from products  →  total = Σ line totals            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  fiado_core::schedule::compute_schedule(total, rate, n)             │
//! │       │   down_payment = round_half_up(total × rate)                │
//! │       │   balance      = total − down_payment                       │
//! │       │   installment  = round_half_up(balance ÷ n)                 │
//! │       ▼                                                             │
//! │  ONE transaction: guarded stock decrements + sale + items           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Payment Registration and Retries
//! The core ledger computes the new balance from the sale we read; the
//! repository only persists it if the row's version is still the one we
//! read. A stale write means another payment landed in between, so we
//! reread and recompute - the recomputation resees the reduced balance
//! and may now reject the amount as exceeding it. Bounded retries; a
//! sale that keeps moving surfaces as a CONFLICT.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::{CreditService, MAX_PAYMENT_RETRIES};
use fiado_core::{
    ledger, schedule, validation, DownPaymentRate, Money, PaymentInterval, PaymentMethod, Sale,
    SaleItem, SaleStatus, DEFAULT_DOWN_PAYMENT_BPS, DEFAULT_NUMBER_OF_PAYMENTS,
};
use fiado_db::repository::sale::{generate_sale_id, generate_sale_item_id};
use fiado_db::DbError;

// =============================================================================
// Request / Response Types
// =============================================================================

/// One line of a new sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    pub product_id: String,
    pub quantity: i64,
}

/// A new sale request.
///
/// For credit sales, either `down_payment_cents` (operator-entered
/// amount) or `down_payment_bps` (rate) may be given; the rate wins
/// only when no explicit amount is present, and the 10% default
/// applies when neither is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub client_id: String,
    pub items: Vec<NewSaleItem>,
    #[serde(default)]
    pub is_credit: bool,
    #[serde(default)]
    pub down_payment_cents: Option<i64>,
    #[serde(default)]
    pub down_payment_bps: Option<u32>,
    #[serde(default)]
    pub number_of_payments: Option<u32>,
    #[serde(default)]
    pub interval: Option<PaymentInterval>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleResponse {
    pub sale_id: String,
    pub total_cents: i64,
    pub down_payment_cents: i64,
    pub balance_due_cents: i64,
    pub installment_cents: i64,
    pub number_of_payments: i64,
    pub item_count: usize,
    pub status: SaleStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentResponse {
    pub payment_id: String,
    pub sale_id: String,
    pub amount_cents: i64,
    pub balance_due_cents: i64,
    pub status: SaleStatus,
    pub paid_off: bool,
}

// =============================================================================
// Operations
// =============================================================================

impl CreditService {
    /// Creates a sale.
    ///
    /// Cash sales are stored settled (no balance, no schedule). Credit
    /// sales get an amortization schedule and an opening balance; a
    /// down payment at or above the total settles the sale at creation.
    ///
    /// Stock is decremented inside the same transaction that inserts
    /// the sale, with a guard against concurrent oversell.
    pub async fn create_sale(&self, request: NewSale) -> ServiceResult<CreateSaleResponse> {
        debug!(client_id = %request.client_id, items = request.items.len(), credit = request.is_credit, "create_sale");

        if request.items.is_empty() {
            return Err(ServiceError::validation("Sale must have at least one item"));
        }

        let client = self
            .db()
            .clients()
            .get_by_id(&request.client_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", &request.client_id))?;

        let now = Utc::now();
        let sale_id = generate_sale_id();

        // Snapshot prices up front. The transactional guard in the
        // repository still protects against a concurrent sale draining
        // stock between this read and the write.
        let mut items = Vec::with_capacity(request.items.len());
        let mut total = Money::zero();
        for line in &request.items {
            validation::validate_quantity(line.quantity)?;

            let product = self
                .db()
                .products()
                .get_by_id(&line.product_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Product", &line.product_id))?;

            if !product.can_sell(line.quantity) {
                return Err(ServiceError::new(
                    crate::ErrorCode::InsufficientStock,
                    format!(
                        "Insufficient stock for {}: {} available, {} requested",
                        product.name, product.stock, line.quantity
                    ),
                ));
            }

            let line_total = product.price().multiply_quantity(line.quantity);
            total += line_total;

            items.push(SaleItem {
                id: generate_sale_item_id(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                name_snapshot: product.name.clone(),
                unit_price_cents: product.price_cents,
                quantity: line.quantity,
                line_total_cents: line_total.cents(),
                created_at: now,
            });
        }

        let sale = if request.is_credit {
            let number_of_payments = request
                .number_of_payments
                .unwrap_or(DEFAULT_NUMBER_OF_PAYMENTS);
            validation::validate_number_of_payments(number_of_payments as i64)?;

            let (plan, rate_bps) = match request.down_payment_cents {
                Some(cents) => {
                    let plan = schedule::compute_schedule_with_down_payment(
                        total,
                        Money::from_cents(cents),
                        number_of_payments,
                    )?;
                    (plan, 0)
                }
                None => {
                    let bps = request.down_payment_bps.unwrap_or(DEFAULT_DOWN_PAYMENT_BPS);
                    let rate = DownPaymentRate::from_bps(bps);
                    let plan = schedule::compute_schedule(total, rate, number_of_payments)?;
                    (plan, bps as i64)
                }
            };

            Sale {
                id: sale_id.clone(),
                client_id: client.id.clone(),
                status: if plan.is_settled() {
                    SaleStatus::PaidOff
                } else {
                    SaleStatus::Active
                },
                total_cents: total.cents(),
                is_credit: true,
                down_payment_cents: plan.down_payment.cents(),
                balance_due_cents: plan.balance.cents(),
                number_of_payments: number_of_payments as i64,
                installment_cents: plan.installment.cents(),
                interest_rate_bps: rate_bps,
                interval: request.interval.unwrap_or(PaymentInterval::Weekly),
                notes: request.notes.clone(),
                sale_date: now,
                updated_at: now,
                version: 0,
            }
        } else {
            // Cash sale: collected in full at the counter.
            Sale {
                id: sale_id.clone(),
                client_id: client.id.clone(),
                status: SaleStatus::PaidOff,
                total_cents: total.cents(),
                is_credit: false,
                down_payment_cents: 0,
                balance_due_cents: 0,
                number_of_payments: 0,
                installment_cents: 0,
                interest_rate_bps: 0,
                interval: PaymentInterval::Weekly,
                notes: request.notes.clone(),
                sale_date: now,
                updated_at: now,
                version: 0,
            }
        };

        self.db().sales().create_sale(&sale, &items).await?;

        info!(
            sale_id = %sale.id,
            client_id = %sale.client_id,
            total = %sale.total_cents,
            balance = %sale.balance_due_cents,
            credit = sale.is_credit,
            "Sale created"
        );

        Ok(CreateSaleResponse {
            sale_id: sale.id.clone(),
            total_cents: sale.total_cents,
            down_payment_cents: sale.down_payment_cents,
            balance_due_cents: sale.balance_due_cents,
            installment_cents: sale.installment_cents,
            number_of_payments: sale.number_of_payments,
            item_count: items.len(),
            status: sale.status,
        })
    }

    /// Registers a payment against a credit sale.
    ///
    /// Safe under concurrency: the version-guarded write rejects stale
    /// balances and the operation retries against fresh state, so the
    /// ledger can never be overdrawn by simultaneous payments.
    pub async fn register_payment(
        &self,
        sale_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
        notes: Option<String>,
    ) -> ServiceResult<RegisterPaymentResponse> {
        debug!(sale_id = %sale_id, amount = %amount_cents, "register_payment");

        let mut attempt = 0;
        loop {
            let sale = self
                .db()
                .sales()
                .get_by_id(sale_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

            let (updated, payment) = ledger::register_payment(
                &sale,
                Money::from_cents(amount_cents),
                method,
                notes.clone(),
                Utc::now(),
            )?;

            match self
                .db()
                .sales()
                .record_payment(&updated, &payment, sale.version)
                .await
            {
                Ok(()) => {
                    info!(
                        sale_id = %sale_id,
                        payment_id = %payment.id,
                        amount = %payment.amount_cents,
                        balance = %updated.balance_due_cents,
                        "Payment registered"
                    );
                    return Ok(RegisterPaymentResponse {
                        payment_id: payment.id,
                        sale_id: sale_id.to_string(),
                        amount_cents: payment.amount_cents,
                        balance_due_cents: updated.balance_due_cents,
                        status: updated.status,
                        paid_off: updated.status == SaleStatus::PaidOff,
                    });
                }
                Err(DbError::ConcurrentModification { .. }) if attempt < MAX_PAYMENT_RETRIES => {
                    attempt += 1;
                    warn!(sale_id = %sale_id, attempt, "Stale payment write, retrying with fresh balance");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
