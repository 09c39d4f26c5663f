//! # tally-core: Pure Billing Logic for Tally POS
//!
//! This crate holds the billing rules as pure functions and plain data, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 till (terminal front end)                       │   │
//! │  │      add ──► show ──► bill ──► history                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                      BillSession (till)                         │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼───────────────────┐  ┌───────────▼────────────────┐  │
//! │  │   ★ tally-core (THIS CRATE) ★    │  │   tally-db (Ledger)        │  │
//! │  │   OpenBill  Money  TaxRate       │  │   SQLite bills table       │  │
//! │  │   validation  error              │  │                            │  │
//! │  └──────────────────────────────────┘  └────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`bill`] - The open bill accumulator and item summary encoding
//! - [`types`] - Domain types (LineItem, FinalizedBill, TaxRate, ...)
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`validation`] - Per-field parse-and-validate functions
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::bill::OpenBill;
//! use tally_core::types::TaxRate;
//! use rust_decimal_macros::dec;
//!
//! let mut bill = OpenBill::new();
//! bill.add("Soap", "2", "50.0").unwrap();
//! bill.add("Oil", "1", "120").unwrap();
//!
//! let totals = bill.preview(TaxRate::from_percent(dec!(18))).unwrap();
//! assert_eq!(totals.subtotal.amount(), dec!(220));
//! assert_eq!(totals.tax.amount(), dec!(39.60));
//! assert_eq!(totals.total.amount(), dec!(259.60));
//! ```

pub mod bill;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use bill::OpenBill;
pub use error::{CoreError, CoreResult, InputField, ValidationError};
pub use money::Money;
pub use rust_decimal::Decimal;
pub use types::*;

/// Tax rate applied when nothing else is configured: 18% (GST).
pub const DEFAULT_TAX_RATE_PERCENT: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// Separator between items in a bill's summary text.
pub const ITEMS_SUMMARY_SEPARATOR: &str = "; ";
