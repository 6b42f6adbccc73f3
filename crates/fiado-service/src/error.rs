//! # Service Error Type
//!
//! Unified error type for service operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Credit Ledger                      │
//! │                                                                         │
//! │  Adapter (CLI / API)         Service Layer                              │
//! │  ───────────────────         ─────────────                              │
//! │                                                                         │
//! │  register_payment(...)                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Service Method                                                  │  │
//! │  │  Result<T, ServiceError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Domain Error? ── CoreError::PaymentExceeds ── ServiceError ──► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The adapter receives a machine-readable `code` plus a                  │
//! │  human-readable `message`:                                              │
//! │  { "code": "PAYMENT_ERROR", "message": "Payment of 60000 exceeds..." }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use fiado_core::{CoreError, ValidationError};
use fiado_db::DbError;

/// Error returned from service operations.
///
/// ## Serialization
/// This is what API adapters serialize when an operation fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Sale not found: 8c1f..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Business rule rejected the operation
    BusinessLogic,

    /// Insufficient stock for a sale item
    InsufficientStock,

    /// Payment rejected (non-positive, exceeds balance, sale settled)
    PaymentError,

    /// Concurrent writers collided and retries were exhausted
    Conflict,

    /// Internal error
    Internal,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a conflict error (optimistic-concurrency retries exhausted).
    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Conflict, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ServiceError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ServiceError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConcurrentModification { entity, id } => ServiceError::conflict(format!(
                "{} {} was modified concurrently; please retry",
                entity, id
            )),
            DbError::InsufficientStock { product_id } => ServiceError::new(
                ErrorCode::InsufficientStock,
                format!("Insufficient stock for product {}", product_id),
            ),
            DbError::ConnectionFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ServiceError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core (domain) errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidScheduleParameters { reason } => ServiceError::new(
                ErrorCode::ValidationError,
                format!("Invalid schedule parameters: {}", reason),
            ),
            CoreError::InvalidPaymentAmount { reason } => ServiceError::new(
                ErrorCode::PaymentError,
                format!("Invalid payment amount: {}", reason),
            ),
            CoreError::PaymentExceedsBalance {
                sale_id,
                amount_cents,
                balance_cents,
            } => ServiceError::new(
                ErrorCode::PaymentError,
                format!(
                    "Payment of {} exceeds balance due of {} on sale {}",
                    amount_cents, balance_cents, sale_id
                ),
            ),
            CoreError::SaleAlreadyPaid(id) => ServiceError::new(
                ErrorCode::BusinessLogic,
                format!("Sale {} is already paid off", id),
            ),
            CoreError::InsufficientStock {
                product,
                available,
                requested,
            } => ServiceError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product, available, requested
                ),
            ),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::validation(err.to_string())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_not_found_maps_to_not_found_code() {
        let err: ServiceError = DbError::not_found("Sale", "abc").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("Sale not found: abc"));
    }

    #[test]
    fn stale_write_maps_to_conflict() {
        let err: ServiceError = DbError::stale("Sale", "abc").into();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn exceeding_payment_maps_to_payment_error() {
        let err: ServiceError = CoreError::PaymentExceedsBalance {
            sale_id: "s1".to_string(),
            amount_cents: 60_000,
            balance_cents: 50_000,
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert!(err.message.contains("60000"));
    }

    #[test]
    fn serializes_with_camel_case_and_screaming_code() {
        let err = ServiceError::not_found("Client", "c1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Client not found: c1");
    }
}
