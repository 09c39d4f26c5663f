//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ValidationError  - One bad input field                            │
//! │  └── CoreError        - Billing rule failures                          │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Record store failures                          │
//! │                                                                         │
//! │  till errors (app)                                                     │
//! │  ├── BillingError     - What a session operation returns               │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BillingError → AppError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Which raw input field failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Quantity,
    UnitPrice,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::Quantity => f.write_str("quantity"),
            InputField::UnitPrice => f.write_str("unit price"),
        }
    }
}

/// Input validation errors.
///
/// Each variant maps to exactly one failure mode of the line-item form, so the
/// front end can tell them apart without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Item name is empty after trimming.
    #[error("Item name is required")]
    MissingName,

    /// Quantity is not a positive integer, or unit price is not a
    /// non-negative amount with at most two decimals.
    #[error("Invalid {field}: '{input}'")]
    InvalidQuantityOrPrice { field: InputField, input: String },

    /// Tax percentage is malformed or outside 0..=100.
    #[error("Invalid tax rate: '{input}' (expected a percentage between 0 and 100)")]
    InvalidTaxRate { input: String },
}

impl ValidationError {
    /// Creates an `InvalidQuantityOrPrice` error for the given field.
    pub fn invalid(field: InputField, input: impl Into<String>) -> Self {
        ValidationError::InvalidQuantityOrPrice {
            field,
            input: input.into(),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Billing rule errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A form field was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Finalize was requested with no items on the bill.
    #[error("Bill is empty: add items first")]
    EmptyBill,

    /// Tax plus subtotal does not fit the money type.
    #[error("Bill total is too large to represent")]
    AmountOverflow,
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
