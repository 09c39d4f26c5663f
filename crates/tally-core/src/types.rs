//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │     NewBill     │   │  FinalizedBill  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │──►│  items          │──►│  id (ledger)    │       │
//! │  │  quantity       │   │  items_summary  │   │  created_at     │       │
//! │  │  unit_price     │   │  subtotal/tax   │   │  items_summary  │       │
//! │  │  line_total     │   │  total          │   │  subtotal/tax/… │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │     OpenBill.add         OpenBill.close        Ledger.store             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    TaxRate      │   │    BillItem     │                             │
//! │  │  percent        │   │  stored line    │                             │
//! │  │  (Decimal)      │   │  item snapshot  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{parse_decimal, Money};
use crate::DEFAULT_TAX_RATE_PERCENT;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate as a percentage: `18` means 18%.
///
/// Range checks live in [`parse_tax_rate`](crate::validation::parse_tax_rate);
/// this type only carries the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    #[inline]
    pub const fn from_percent(percent: Decimal) -> Self {
        TaxRate(percent)
    }

    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(DEFAULT_TAX_RATE_PERCENT)
    }
}

/// Percentage without trailing zeros: `18%`, `8.5%`, `8.25%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl TryFrom<String> for TaxRate {
    type Error = rust_decimal::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_decimal(&value)
            .map(TaxRate)
            .ok_or_else(|| rust_decimal::Error::ErrorString(format!("invalid tax rate: {value}")))
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One entry on an open bill.
///
/// Only [`OpenBill::add`](crate::bill::OpenBill::add) builds these, after every
/// field has been validated, so a `LineItem` always has a non-empty name, a
/// positive quantity and `line_total == quantity × unit_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    name: String,
    quantity: i64,
    unit_price: Money,
    line_total: Money,
}

impl LineItem {
    pub(crate) fn new(name: String, quantity: i64, unit_price: Money, line_total: Money) -> Self {
        LineItem {
            name,
            quantity,
            unit_price,
            line_total,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

// =============================================================================
// Bill Totals
// =============================================================================

/// Subtotal, tax and grand total of a bill at a given rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillTotals {
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax: Money,
    pub total: Money,
}

impl BillTotals {
    /// Computes tax and total for a subtotal; `None` if the total overflows.
    pub fn compute(subtotal: Money, tax_rate: TaxRate) -> Option<Self> {
        let tax = subtotal.calculate_tax(tax_rate)?;
        let total = subtotal.checked_add(tax)?;
        Some(BillTotals {
            subtotal,
            tax_rate,
            tax,
            total,
        })
    }
}

// =============================================================================
// New Bill
// =============================================================================

/// A closed bill that has not been stored yet (no id).
///
/// Produced by [`OpenBill::close`](crate::bill::OpenBill::close) and handed to
/// the ledger, which assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBill {
    pub created_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub items_summary: String,
    pub totals: BillTotals,
}

impl NewBill {
    /// Builds the stored record once the ledger has assigned an id.
    pub fn assign_id(&self, id: i64) -> FinalizedBill {
        FinalizedBill {
            id,
            created_at: self.created_at,
            items_summary: self.items_summary.clone(),
            subtotal: self.totals.subtotal,
            tax: self.totals.tax,
            total: self.totals.total,
            tax_rate: self.totals.tax_rate,
        }
    }
}

// =============================================================================
// Finalized Bill
// =============================================================================

/// A stored, immutable bill record.
///
/// Amounts are stored as decimal text and read back exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FinalizedBill {
    /// Sequential id assigned by the ledger, never reused.
    pub id: i64,
    /// When the bill was finalized (UTC, whole seconds).
    pub created_at: DateTime<Utc>,
    /// Display-only encoding: `Soap(2x50.00); Oil(1x120.00)`.
    pub items_summary: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub subtotal: Money,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub tax: Money,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub total: Money,
    /// Rate the tax was computed at.
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub tax_rate: TaxRate,
}

impl FinalizedBill {
    pub fn totals(&self) -> BillTotals {
        BillTotals {
            subtotal: self.subtotal,
            tax_rate: self.tax_rate,
            tax: self.tax,
            total: self.total,
        }
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line item as stored with a finalized bill.
/// Snapshot of the line at finalize time, kept alongside the summary text so
/// a bill can be reconstructed item by item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BillItem {
    pub bill_id: i64,
    /// Zero-based position on the bill.
    pub position: i64,
    pub name: String,
    pub quantity: i64,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub unit_price: Money,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub line_total: Money,
}

impl BillItem {
    /// Whether this stored row carries the same values as an open-bill line.
    pub fn matches(&self, item: &LineItem) -> bool {
        self.name == item.name()
            && self.quantity == item.quantity()
            && self.unit_price == item.unit_price()
            && self.line_total == item.line_total()
    }
}
