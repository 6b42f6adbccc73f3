//! # fiado-service: Service Layer for the Credit Ledger
//!
//! This crate wires the pure domain logic of `fiado-core` to the SQLite
//! persistence of `fiado-db` and exposes the operations an adapter
//! (CLI, HTTP API, desktop shell) calls.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Credit Ledger Layering                             │
//! │                                                                         │
//! │  Adapter (CLI / API)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  fiado-service (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   CreditService                                                 │   │
//! │  │   ├── create_sale / register_payment      (sales.rs)            │   │
//! │  │   ├── client_statement                    (statements.rs)       │   │
//! │  │   ├── overdue_reminders                   (reminders.rs)        │   │
//! │  │   ├── pending_credits / summary           (reports.rs)          │   │
//! │  │   ├── log_collection / collection_history (collections.rs)      │   │
//! │  │   └── client / product CRUD               (clients, products)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                          │                                      │
//! │       ▼                          ▼                                      │
//! │  fiado-core                 fiado-db                                    │
//! │  (schedules, ledger,        (repositories, transactions,                │
//! │   risk classification)       optimistic-concurrency guard)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Contract
//! `register_payment` is safe to call concurrently for the same sale:
//! the version-guarded write in `fiado-db` rejects stale updates and
//! the service retries with fresh state, so two simultaneous payments
//! can never together overdraw a balance.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clients;
pub mod collections;
pub mod error;
pub mod products;
pub mod reminders;
pub mod reports;
pub mod sales;
pub mod statements;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use clients::{ClientUpdate, NewClient};
pub use collections::NewCollectionLog;
pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use products::{NewProduct, ProductUpdate};
pub use reminders::OverdueReminder;
pub use reports::{LedgerSummary, PendingCredit};
pub use sales::{CreateSaleResponse, NewSale, NewSaleItem, RegisterPaymentResponse};
pub use statements::{ClientStatement, StatementSale};

use fiado_core::RiskConfig;
use fiado_db::Database;

/// How many times `register_payment` rereads and retries after the
/// version guard rejects a stale write.
pub(crate) const MAX_PAYMENT_RETRIES: u32 = 3;

/// The service facade. One instance per process; cloning is cheap
/// (the underlying pool is shared).
#[derive(Debug, Clone)]
pub struct CreditService {
    db: Database,
    risk: RiskConfig,
}

impl CreditService {
    /// Creates a service over an initialized database, with the default
    /// risk configuration (America/Mexico_City business days, 7-day low
    /// threshold, 3-day warning window).
    pub fn new(db: Database) -> Self {
        CreditService {
            db,
            risk: RiskConfig::default(),
        }
    }

    /// Creates a service with a custom risk configuration.
    pub fn with_risk_config(db: Database, risk: RiskConfig) -> Self {
        CreditService { db, risk }
    }

    /// Access to the underlying database (adapters that need raw reads).
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The active risk configuration.
    pub fn risk_config(&self) -> &RiskConfig {
        &self.risk
    }
}
