//! # Error Types
//!
//! Domain-specific error types for fiado-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  fiado-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  fiado-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  fiado-service errors                                               │
//! │  └── ServiceError     - What API adapters see (serialized)          │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (sale id, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every error is terminal for the triggering operation - the core
//!    never retries on its own

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are raised
/// before any state is written, so a failing operation leaves no partial
/// ledger mutation behind.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Amortization inputs are unusable: non-positive total, rate at or
    /// above 100%, or a zero-length term.
    #[error("Invalid schedule parameters: {reason}")]
    InvalidScheduleParameters { reason: String },

    /// Payment amount is zero or negative.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Payment would overdraw the sale's balance.
    ///
    /// The ledger never accepts overpayment; the caller must cap the
    /// amount or split the registration.
    #[error("Payment of {amount_cents} exceeds balance due of {balance_cents} on sale {sale_id}")]
    PaymentExceedsBalance {
        sale_id: String,
        amount_cents: i64,
        balance_cents: i64,
    },

    /// Payment registered against an already settled sale.
    #[error("Sale {0} is already paid off")]
    SaleAlreadyPaid(String),

    /// Insufficient stock to complete a sale.
    ///
    /// ## When This Occurs
    /// - Line item quantity exceeds available stock
    /// - A concurrent sale consumed the stock first (guarded decrement)
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Used for
/// early validation before business logic runs, so malformed input is
/// rejected at the boundary rather than downstream.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid phone).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate phone).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PaymentExceedsBalance {
            sale_id: "s-1".to_string(),
            amount_cents: 60000,
            balance_cents: 50000,
        };
        assert_eq!(
            err.to_string(),
            "Payment of 60000 exceeds balance due of 50000 on sale s-1"
        );

        let err = CoreError::InsufficientStock {
            product: "Televisor 32\"".to_string(),
            available: 1,
            requested: 2,
        };
        assert!(err.to_string().contains("available 1, requested 2"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "phone is required");

        let err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "phone".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
