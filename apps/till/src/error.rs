//! # Error Types
//!
//! Session errors and their user-facing form.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally POS                              │
//! │                                                                         │
//! │  BillSession::add / finalize / list_all                                 │
//! │         │                                                               │
//! │         ├── CoreError (validation, empty bill) ──┐                      │
//! │         │                                        ├──► BillingError      │
//! │         └── DbError (any) ─► StorageUnavailable ─┘         │            │
//! │                                                            ▼            │
//! │                                            AppError { code, message }   │
//! │                                                            │            │
//! │                                                            ▼            │
//! │                                         printed, loop keeps running     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use tally_core::{CoreError, ValidationError};
use tally_db::DbError;

// =============================================================================
// Billing Error
// =============================================================================

/// Errors returned by [`BillSession`](crate::state::BillSession) operations.
///
/// A failed operation never leaves partial state behind: the open bill and
/// the ledger are exactly as they were before the call.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Input or billing rule failure (missing name, bad quantity, empty bill).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The record store could not be read or written. Not retried.
    #[error("Bill storage unavailable: {0}")]
    StorageUnavailable(#[from] DbError),
}

impl From<ValidationError> for BillingError {
    fn from(err: ValidationError) -> Self {
        BillingError::Core(err.into())
    }
}

/// Result type for session operations.
pub type BillingResult<T> = Result<T, BillingError>;

// =============================================================================
// App Error
// =============================================================================

/// Error as shown to the user.
///
/// ```json
/// { "code": "EMPTY_BILL", "message": "Add items first" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for user-facing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingName,
    InvalidQuantityOrPrice,
    InvalidTaxRate,
    EmptyBill,
    StorageUnavailable,
    /// Unknown command or bad command arguments
    InvalidCommand,
    NotFound,
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_command(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::InvalidCommand, message)
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{resource} #{id} not found"))
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::Core(CoreError::Validation(e)) => AppError::from(e),
            BillingError::Core(CoreError::EmptyBill) => {
                AppError::new(ErrorCode::EmptyBill, "Add items first")
            }
            BillingError::Core(CoreError::AmountOverflow) => AppError::new(
                ErrorCode::InvalidQuantityOrPrice,
                "Bill total is too large; split it into smaller bills",
            ),
            BillingError::StorageUnavailable(e) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %e, "Bill storage unavailable");
                AppError::new(
                    ErrorCode::StorageUnavailable,
                    "Bill storage is unavailable; nothing was saved",
                )
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingName => AppError::new(ErrorCode::MissingName, "Enter item name"),
            ValidationError::InvalidQuantityOrPrice { field, input } => AppError::new(
                ErrorCode::InvalidQuantityOrPrice,
                format!("Enter valid quantity and price (bad {field}: '{input}')"),
            ),
            e @ ValidationError::InvalidTaxRate { .. } => {
                AppError::new(ErrorCode::InvalidTaxRate, e.to_string())
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::InputField;

    #[test]
    fn test_validation_codes() {
        let err = AppError::from(BillingError::from(ValidationError::MissingName));
        assert_eq!(err.code, ErrorCode::MissingName);
        assert_eq!(err.message, "Enter item name");

        let err = AppError::from(BillingError::from(ValidationError::invalid(
            InputField::Quantity,
            "0",
        )));
        assert_eq!(err.code, ErrorCode::InvalidQuantityOrPrice);
        assert_eq!(err.message, "Enter valid quantity and price (bad quantity: '0')");
    }

    #[test]
    fn test_empty_bill_code() {
        let err = AppError::from(BillingError::Core(CoreError::EmptyBill));
        assert_eq!(err.code, ErrorCode::EmptyBill);
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let err = AppError::from(BillingError::StorageUnavailable(DbError::QueryFailed(
            "database or disk is full".to_string(),
        )));
        assert_eq!(err.code, ErrorCode::StorageUnavailable);
        assert!(!err.message.contains("disk is full"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = AppError::new(ErrorCode::EmptyBill, "Add items first");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "EMPTY_BILL");
        assert_eq!(json["message"], "Add items first");
    }
}
