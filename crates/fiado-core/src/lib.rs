//! # fiado-core: Pure Business Logic for the Credit Ledger Engine
//!
//! This crate is the **heart** of the credit-sale system. It contains
//! the amortization, ledger and collections-risk logic as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Credit Ledger Architecture                      │
//! │                                                                     │
//! │  ┌──────────────────────────────────────────────────────────────┐   │
//! │  │  Calling surfaces (forms, receipts, dashboards, portal)      │   │
//! │  └──────────────────────────────┬───────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼───────────────────────────────┐   │
//! │  │                  fiado-service (operations)                  │   │
//! │  └──────────────────────────────┬───────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ fiado-core (THIS CRATE) ★                    │   │
//! │  │                                                              │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐     │   │
//! │  │  │ schedule │ │  ledger  │ │   risk   │ │ types/money  │     │   │
//! │  │  │ amortize │ │ payments │ │ classify │ │ validation   │     │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────────┘     │   │
//! │  │                                                              │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │   │
//! │  └──────────────────────────────┬───────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼───────────────────────────────┐   │
//! │  │                 fiado-db (SQLite repositories)               │   │
//! │  └──────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows one direction: [`schedule`] establishes the terms at sale
//! creation, [`ledger`] mutates balance and payment history over time,
//! [`risk`] reads the result plus wall-clock time to classify urgency.
//! The three never reach into each other's internals; they communicate
//! only through the [`types::Sale`] fields.
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Product, Sale, Payment, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`schedule`] - Amortization Calculator
//! - [`ledger`] - Payment Ledger
//! - [`risk`] - Collections Risk Classifier
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, everywhere
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use fiado_core::money::{DownPaymentRate, Money};
//! use fiado_core::schedule::compute_schedule;
//!
//! // $10,000.00 financed at 10% down over 17 weekly payments
//! let schedule = compute_schedule(
//!     Money::from_cents(1_000_000),
//!     DownPaymentRate::from_bps(1000),
//!     17,
//! )
//! .unwrap();
//!
//! assert_eq!(schedule.installment.cents(), 52_941); // $529.41
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod risk;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fiado_core::Money` instead of
// `use fiado_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{DownPaymentRate, Money};
pub use risk::{RiskAssessment, RiskConfig};
pub use schedule::PaymentSchedule;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default down-payment rate for credit sales (10%).
///
/// The observed store default; operators can override it with a custom
/// amount at sale time.
pub const DEFAULT_DOWN_PAYMENT_BPS: u32 = 1000;

/// Default credit term when the operator doesn't pick one.
pub const DEFAULT_NUMBER_OF_PAYMENTS: u32 = 17;
