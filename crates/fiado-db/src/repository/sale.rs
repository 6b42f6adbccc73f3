//! # Sale Repository
//!
//! Database operations for sales, sale items and the payment ledger.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE                                                          │
//! │     └── create_sale() - ONE transaction:                            │
//! │           guarded stock decrement per item                          │
//! │           INSERT sale (balance, schedule, version 0)                │
//! │           INSERT sale_items (price snapshots)                       │
//! │                                                                     │
//! │  2. COLLECT (repeat until balance 0)                                │
//! │     └── record_payment() - ONE transaction:                         │
//! │           INSERT payment (append-only)                              │
//! │           UPDATE sale balance/status                                │
//! │             WHERE id = ? AND version = ?   ← optimistic guard       │
//! │                                                                     │
//! │  There is no step 3. Payments are never edited or removed.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why the Version Guard
//! Two concurrent registrations against the same sale would otherwise
//! both read the same balance and together overdraw it - a correctness
//! bug, not a UI race. The conditional update makes the second writer
//! fail with [`DbError::ConcurrentModification`]; the service layer
//! rereads and retries.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::{Payment, Sale, SaleItem};

const SALE_COLUMNS: &str = "id, client_id, status, total_cents, is_credit, down_payment_cents, \
     balance_due_cents, number_of_payments, installment_cents, interest_rate_bps, \
     interval, notes, sale_date, updated_at, version";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists a client's sales, newest first.
    pub async fn list_by_client(&self, client_id: &str) -> DbResult<Vec<Sale>> {
        let sql =
            format!("SELECT {SALE_COLUMNS} FROM sales WHERE client_id = ?1 ORDER BY sale_date DESC");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists all open credit sales (the collections working set).
    pub async fn list_open_credit(&self) -> DbResult<Vec<Sale>> {
        let sql = format!(
            r#"
            SELECT {SALE_COLUMNS} FROM sales
            WHERE is_credit = 1 AND status = 'active' AND balance_due_cents > 0
            ORDER BY sale_date
            "#
        );
        let sales = sqlx::query_as::<_, Sale>(&sql).fetch_all(&self.pool).await?;

        Ok(sales)
    }

    /// Gets all items for a sale.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name_snapshot, unit_price_cents,
                   quantity, line_total_cents, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets all payments for a sale, in chronological order.
    pub async fn get_payments(&self, sale_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, method, notes, paid_at
            FROM payments
            WHERE sale_id = ?1
            ORDER BY paid_at, id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Gets total amount paid on a sale.
    pub async fn get_total_paid(&self, sale_id: &str) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_cents) FROM payments WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a sale with its line items, decrementing product stock,
    /// all in one transaction.
    ///
    /// ## Atomicity
    /// Any failure - including a guarded stock decrement finding less
    /// stock than a concurrent sale just took - rolls back every
    /// decrement and insert. No partial stock mutation can persist.
    pub async fn create_sale(&self, sale: &Sale, items: &[SaleItem]) -> DbResult<()> {
        debug!(id = %sale.id, client_id = %sale.client_id, total = %sale.total_cents, "Creating sale");

        let mut tx = self.pool.begin().await?;

        for item in items {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND is_active = 1 AND stock >= ?2
                "#,
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(sale.sale_date)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let exists: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?1")
                        .bind(&item.product_id)
                        .fetch_one(&mut *tx)
                        .await?;

                // Dropping tx rolls back the earlier decrements.
                return if exists > 0 {
                    Err(DbError::InsufficientStock {
                        product_id: item.product_id.clone(),
                    })
                } else {
                    Err(DbError::not_found("Product", &item.product_id))
                };
            }
        }

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, client_id, status, total_cents, is_credit,
                down_payment_cents, balance_due_cents, number_of_payments,
                installment_cents, interest_rate_bps, interval, notes,
                sale_date, updated_at, version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.client_id)
        .bind(sale.status)
        .bind(sale.total_cents)
        .bind(sale.is_credit)
        .bind(sale.down_payment_cents)
        .bind(sale.balance_due_cents)
        .bind(sale.number_of_payments)
        .bind(sale.installment_cents)
        .bind(sale.interest_rate_bps)
        .bind(sale.interval)
        .bind(&sale.notes)
        .bind(sale.sale_date)
        .bind(sale.updated_at)
        .bind(sale.version)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, name_snapshot,
                    unit_price_cents, quantity, line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Persists a payment and the recomputed sale state in one
    /// transaction, guarded by the version the caller read.
    ///
    /// ## Arguments
    /// * `updated` - the sale as computed by the core ledger (new
    ///   balance, status, incremented version)
    /// * `payment` - the payment row to append
    /// * `expected_version` - the version the ledger computation read
    ///
    /// ## Returns
    /// * `Err(DbError::ConcurrentModification)` - another registration
    ///   landed first; reread and retry
    pub async fn record_payment(
        &self,
        updated: &Sale,
        payment: &Payment,
        expected_version: i64,
    ) -> DbResult<()> {
        debug!(
            sale_id = %payment.sale_id,
            amount = %payment.amount_cents,
            expected_version = %expected_version,
            "Recording payment"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                balance_due_cents = ?2,
                status = ?3,
                updated_at = ?4,
                version = ?5
            WHERE id = ?1 AND version = ?6
            "#,
        )
        .bind(&updated.id)
        .bind(updated.balance_due_cents)
        .bind(updated.status)
        .bind(updated.updated_at)
        .bind(updated.version)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE id = ?1")
                .bind(&updated.id)
                .fetch_one(&mut *tx)
                .await?;

            return if exists > 0 {
                Err(DbError::stale("Sale", &updated.id))
            } else {
                Err(DbError::not_found("Sale", &updated.id))
            };
        }

        sqlx::query(
            r#"
            INSERT INTO payments (id, sale_id, amount_cents, method, notes, paid_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.sale_id)
        .bind(payment.amount_cents)
        .bind(payment.method)
        .bind(&payment.notes)
        .bind(payment.paid_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Sale counts: (total, credit, paid_off).
    pub async fn counts(&self) -> DbResult<(i64, i64, i64)> {
        let row: (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN is_credit = 1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'paid_off' THEN 1 ELSE 0 END), 0)
            FROM sales
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Sum of outstanding balances across open credit sales.
    pub async fn outstanding_total(&self) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(balance_due_cents) FROM sales WHERE is_credit = 1 AND status = 'active'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    /// Sum of all registered payments across the ledger.
    pub async fn collected_total(&self) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar("SELECT SUM(amount_cents) FROM payments")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.unwrap_or(0))
    }

    /// Sum of down payments collected at sale time.
    pub async fn down_payment_total(&self) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar("SELECT SUM(down_payment_cents) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.unwrap_or(0))
    }

    /// Sum of all sale totals (cash and credit).
    pub async fn sales_total(&self) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar("SELECT SUM(total_cents) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.unwrap_or(0))
    }
}

/// Helper to generate a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new sale item ID.
pub fn generate_sale_item_id() -> String {
    Uuid::new_v4().to_string()
}
