//! # Domain Types
//!
//! Core domain types for the credit ledger engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐            │
//! │  │    Client    │   │     Sale     │   │   Payment    │            │
//! │  │ ──────────── │   │ ──────────── │   │ ──────────── │            │
//! │  │ id (UUID)    │◄──│ client_id    │◄──│ sale_id (FK) │            │
//! │  │ phone (uniq) │   │ balance_due  │   │ amount_cents │            │
//! │  │ portal hash  │   │ version      │   │ paid_at      │            │
//! │  └──────────────┘   └──────────────┘   └──────────────┘            │
//! │                                                                     │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐            │
//! │  │   Product    │   │   SaleItem   │   │CollectionLog │            │
//! │  │ price, stock │   │  snapshots   │   │  advisory    │            │
//! │  └──────────────┘   └──────────────┘   └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has an `id` (UUID v4, immutable, used for relations);
//! clients additionally carry a business identifier (phone, unique, also
//! the client-portal login).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Client
// =============================================================================

/// A client with an identity and contact record.
///
/// Clients are created by staff and referenced by sales. They are never
/// deleted while sales reference them (FK RESTRICT at the storage layer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub first_name: String,
    pub last_name: String,

    /// Phone number - unique, doubles as the client-portal login.
    pub phone: String,

    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,

    /// Reference to an identification document (INE folio, etc.).
    pub id_document: Option<String>,

    /// Client-portal password hash. Produced and verified outside this
    /// engine; stored here as an opaque value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal_password_hash: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog item available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,
    pub description: Option<String>,

    /// Price in cents (smallest currency unit). Always > 0.
    pub price_cents: i64,

    /// Current stock level. A hard constraint: sales cannot oversell.
    pub stock: i64,

    pub category: Option<String>,
    pub brand: Option<String>,

    /// Media URL for the catalog UI.
    pub image_url: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity can be sold from stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.is_active && self.stock >= quantity
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale. Derived state: a sale is `PaidOff` exactly when
/// its balance due reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Balance outstanding (every credit sale starts here).
    Active,
    /// Balance fully collected (cash sales are stored this way at creation).
    PaidOff,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Active
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Card payment on external terminal.
    Card,
}

// =============================================================================
// Payment Interval
// =============================================================================

/// Payment frequency for a credit schedule.
///
/// The interval length drives both the installment cadence and the
/// due-date projection in the risk classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentInterval {
    /// Every 7 days (the store default).
    Weekly,
    /// Every 15 days ("quincenal").
    Biweekly,
    /// Every 30 days.
    Monthly,
}

impl PaymentInterval {
    /// Interval length in calendar days.
    #[inline]
    pub const fn days(&self) -> i64 {
        match self {
            PaymentInterval::Weekly => 7,
            PaymentInterval::Biweekly => 15,
            PaymentInterval::Monthly => 30,
        }
    }
}

impl Default for PaymentInterval {
    fn default() -> Self {
        PaymentInterval::Weekly
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The central ledger entity.
///
/// Invariant, enforced by the payment ledger and checked by statements:
/// `balance_due_cents == total_cents - down_payment_cents - sum(payments)`
/// and never negative. `status == PaidOff` iff the balance is exactly zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub client_id: String,
    pub status: SaleStatus,

    /// Sum of `unit_price_cents * quantity` across line items.
    pub total_cents: i64,

    pub is_credit: bool,

    /// Upfront portion collected at sale time. 0 for cash sales.
    pub down_payment_cents: i64,

    /// Outstanding balance. Starts at total - down payment for credit
    /// sales, 0 for cash sales.
    pub balance_due_cents: i64,

    /// Fixed term count (e.g., 17 weekly payments).
    pub number_of_payments: i64,

    /// Per-interval payment amount derived by the amortization calculator.
    pub installment_cents: i64,

    /// Informational only - displayed on statements, never compounded
    /// into the balance or the installment.
    pub interest_rate_bps: i64,

    pub interval: PaymentInterval,

    pub notes: Option<String>,

    /// Creation timestamp. Immutable; anchors due-date projection until
    /// the first payment lands.
    pub sale_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Optimistic-concurrency counter. Every balance mutation increments
    /// it; a stale read fails the conditional update.
    pub version: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn down_payment(&self) -> Money {
        Money::from_cents(self.down_payment_cents)
    }

    #[inline]
    pub fn balance_due(&self) -> Money {
        Money::from_cents(self.balance_due_cents)
    }

    #[inline]
    pub fn installment(&self) -> Money {
        Money::from_cents(self.installment_cents)
    }

    /// An open credit sale is the only kind the collections workflow
    /// looks at.
    #[inline]
    pub fn is_open_credit(&self) -> bool {
        self.is_credit && self.balance_due_cents > 0
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at time of sale:
/// later catalog price edits never change a recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Line total (unit_price x quantity).
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// An append-only payment record against a sale's balance.
///
/// Immutable once created: no edit or delete path exists anywhere in the
/// engine. `paid_at` is server-assigned at registration, never supplied
/// by the caller, so insertion order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub sale_id: String,
    /// Amount paid in cents. Always > 0.
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Collection Log
// =============================================================================

/// Outcome of a collection contact attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionResult {
    Promise,
    Paid,
    ContactSuccess,
    NoAnswer,
    WrongNumber,
    Located,
    Refusal,
}

/// An advisory annotation on a sale's collections history.
///
/// Purely informational for the collector workflow - it never affects
/// the balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CollectionLog {
    pub id: String,
    pub sale_id: String,
    pub collector_id: String,
    pub result: CollectionResult,
    pub notes: Option<String>,
    pub next_action_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Severity
// =============================================================================

/// Collections urgency bucket.
///
/// Serialized with the Spanish business labels the collector dashboards
/// and reminder exports use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Past due beyond the low threshold.
    #[serde(rename = "ALTO")]
    Alto,
    /// Mildly overdue (within the low threshold).
    #[serde(rename = "BAJO")]
    Bajo,
    /// Not yet due, but due within the warning window.
    #[serde(rename = "POR_VENCER")]
    PorVencer,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_days() {
        assert_eq!(PaymentInterval::Weekly.days(), 7);
        assert_eq!(PaymentInterval::Biweekly.days(), 15);
        assert_eq!(PaymentInterval::Monthly.days(), 30);
    }

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Active);
    }

    #[test]
    fn test_severity_serde_labels() {
        assert_eq!(serde_json::to_string(&Severity::Alto).unwrap(), "\"ALTO\"");
        assert_eq!(serde_json::to_string(&Severity::Bajo).unwrap(), "\"BAJO\"");
        assert_eq!(
            serde_json::to_string(&Severity::PorVencer).unwrap(),
            "\"POR_VENCER\""
        );
    }

    #[test]
    fn test_product_can_sell() {
        let product = Product {
            id: "p1".to_string(),
            name: "Televisor 32\"".to_string(),
            description: None,
            price_cents: 499_900,
            stock: 3,
            category: None,
            brand: None,
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.can_sell(3));
        assert!(!product.can_sell(4));

        let inactive = Product {
            is_active: false,
            ..product
        };
        assert!(!inactive.can_sell(1));
    }
}
