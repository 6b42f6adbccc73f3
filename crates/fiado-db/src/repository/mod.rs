//! # Repository Module
//!
//! Database repository implementations for the credit ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Service operation                                                  │
//! │       │                                                             │
//! │       │  db.sales().record_payment(&sale, &payment, version)        │
//! │       ▼                                                             │
//! │  SaleRepository ── SQL isolated in one place                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two invariant-bearing operations live here because they need
//! transactions:
//! - [`sale::SaleRepository::create_sale`] - guarded stock decrements +
//!   sale + items, all-or-nothing
//! - [`sale::SaleRepository::record_payment`] - payment insert + version-
//!   conditioned balance update, all-or-nothing
//!
//! ## Available Repositories
//!
//! - [`client::ClientRepository`] - Client CRUD
//! - [`product::ProductRepository`] - Product CRUD and stock
//! - [`sale::SaleRepository`] - Sales, items, payments, aggregates
//! - [`collection::CollectionLogRepository`] - Collector annotations

pub mod client;
pub mod collection;
pub mod product;
pub mod sale;
