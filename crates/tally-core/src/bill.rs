//! # Open Bill
//!
//! The in-progress bill: an ordered list of line items and a running subtotal.
//!
//! ## Bill Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Open Bill Operations                                 │
//! │                                                                         │
//! │  add(name, qty, price)                                                  │
//! │     ├── parse quantity ──✗──► InvalidQuantityOrPrice (bill unchanged)   │
//! │     ├── parse price    ──✗──► InvalidQuantityOrPrice (bill unchanged)   │
//! │     ├── parse name     ──✗──► MissingName            (bill unchanged)   │
//! │     └── items.push(item); subtotal += line_total                        │
//! │                                                                         │
//! │  close(rate) ──► NewBill (pure, bill unchanged)                         │
//! │     └── no items ──► EmptyBill                                          │
//! │                                                                         │
//! │  reset() ──► items.clear(); subtotal = 0                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `subtotal == Σ item.line_total()` at all times. It is maintained
//! incrementally: `add` is the only place it grows, `reset` the only place it
//! shrinks.

use chrono::{SubsecRound, Utc};

use crate::error::{CoreError, CoreResult, InputField, ValidationError};
use crate::money::Money;
use crate::types::{BillTotals, LineItem, NewBill, TaxRate};
use crate::validation::{parse_name, parse_quantity, parse_unit_price};
use crate::ITEMS_SUMMARY_SEPARATOR;

/// The bill currently being rung up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenBill {
    items: Vec<LineItem>,
    subtotal: Money,
}

impl OpenBill {
    /// Creates a new empty bill.
    pub fn new() -> Self {
        OpenBill::default()
    }

    /// Validates the raw form fields and appends a line item.
    ///
    /// Fields are checked quantity, unit price, then name; the first failure
    /// is returned and the bill is left untouched.
    ///
    /// ```rust
    /// use tally_core::bill::OpenBill;
    /// use tally_core::error::{CoreError, ValidationError};
    /// use rust_decimal_macros::dec;
    ///
    /// let mut bill = OpenBill::new();
    /// let item = bill.add("Soap", "2", "50.0").unwrap();
    /// assert_eq!(item.line_total().amount(), dec!(100));
    ///
    /// let err = bill.add("", "1", "10").unwrap_err();
    /// assert_eq!(err, CoreError::Validation(ValidationError::MissingName));
    /// assert_eq!(bill.item_count(), 1);
    /// ```
    pub fn add(&mut self, name: &str, quantity: &str, unit_price: &str) -> CoreResult<LineItem> {
        let quantity_value = parse_quantity(quantity)?;
        let unit_price_value = parse_unit_price(unit_price)?;
        let name = parse_name(name)?;

        let line_total = unit_price_value
            .checked_mul_quantity(quantity_value)
            .ok_or_else(|| ValidationError::invalid(InputField::Quantity, quantity))?;
        let subtotal = self
            .subtotal
            .checked_add(line_total)
            .ok_or_else(|| ValidationError::invalid(InputField::UnitPrice, unit_price))?;

        let item = LineItem::new(name, quantity_value, unit_price_value, line_total);
        self.items.push(item.clone());
        self.subtotal = subtotal;

        Ok(item)
    }

    /// Computes the bill that finalizing now would produce.
    ///
    /// Pure: the open bill is not modified. The caller clears it with
    /// [`reset`](Self::reset) once the bill has been stored.
    pub fn close(&self, tax_rate: TaxRate) -> CoreResult<NewBill> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyBill);
        }

        let totals = BillTotals::compute(self.subtotal, tax_rate).ok_or(CoreError::AmountOverflow)?;

        Ok(NewBill {
            created_at: Utc::now().trunc_subsecs(0),
            items: self.items.clone(),
            items_summary: summarize_items(&self.items),
            totals,
        })
    }

    /// Running totals at the given rate, for display while ringing up.
    pub fn preview(&self, tax_rate: TaxRate) -> Option<BillTotals> {
        BillTotals::compute(self.subtotal, tax_rate)
    }

    /// Clears all items. Idempotent.
    pub fn reset(&mut self) {
        self.items.clear();
        self.subtotal = Money::zero();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Encodes items as `name(qtyxprice)` joined by `"; "`.
///
/// Display-only: names may themselves contain the separator characters, so
/// the text is not parsed back.
///
/// ```rust
/// use tally_core::bill::{summarize_items, OpenBill};
///
/// let mut bill = OpenBill::new();
/// bill.add("Soap", "2", "50").unwrap();
/// bill.add("Oil", "1", "120").unwrap();
/// assert_eq!(summarize_items(bill.items()), "Soap(2x50.00); Oil(1x120.00)");
/// ```
pub fn summarize_items(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}({}x{})", item.name(), item.quantity(), item.unit_price()))
        .collect::<Vec<_>>()
        .join(ITEMS_SUMMARY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn soap_and_oil() -> OpenBill {
        let mut bill = OpenBill::new();
        bill.add("Soap", "2", "50.0").unwrap();
        bill.add("Oil", "1", "120.0").unwrap();
        bill
    }

    fn gst() -> TaxRate {
        TaxRate::from_percent(dec!(18))
    }

    #[test]
    fn test_add_appends_and_accumulates() {
        let mut bill = OpenBill::new();
        let item = bill.add("  Soap ", "2", "50.0").unwrap();

        assert_eq!(item.name(), "Soap");
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.unit_price(), Money::new(dec!(50)));
        assert_eq!(item.line_total(), Money::new(dec!(100)));
        assert_eq!(bill.items(), &[item]);
        assert_eq!(bill.subtotal(), Money::new(dec!(100)));
    }

    #[test]
    fn test_subtotal_equals_sum_of_line_totals() {
        let mut bill = OpenBill::new();
        let inputs = [
            ("Rice", "3", "42.50"),
            ("Dal", "1", "99.99"),
            ("Salt", "10", "0.05"),
            ("Free sample", "5", "0"),
            ("Ghee", "2", "0.5"),
        ];

        for (name, qty, price) in inputs {
            bill.add(name, qty, price).unwrap();
        }

        assert_eq!(bill.subtotal().amount(), dec!(127.50) + dec!(99.99) + dec!(0.50) + dec!(1));
    }

    #[test]
    fn test_fractional_and_scientific_prices() {
        let mut bill = OpenBill::new();
        let petrol = bill.add("Petrol", "1", "101.125").unwrap();
        let sample = bill.add("Sample", "4", "0.005").unwrap();
        let box_ = bill.add("Box", "1", "1e2").unwrap();

        assert_eq!(petrol.unit_price().amount(), dec!(101.125));
        assert_eq!(sample.line_total().amount(), dec!(0.020));
        assert_eq!(box_.line_total().amount(), dec!(100));
        assert_eq!(bill.subtotal().amount(), dec!(201.145));

        let closed = bill.close(gst()).unwrap();
        // 201.145 * 18% = 36.2061 → 36.21
        assert_eq!(closed.totals.tax.amount(), dec!(36.21));
        assert_eq!(closed.totals.total.amount(), dec!(237.355));
        assert_eq!(
            closed.items_summary,
            "Petrol(1x101.125); Sample(4x0.005); Box(1x100.00)"
        );
    }

    #[test]
    fn test_missing_name_leaves_bill_unchanged() {
        let mut bill = soap_and_oil();
        let before = bill.clone();

        let err = bill.add("", "1", "10").unwrap_err();
        assert_eq!(err, CoreError::Validation(ValidationError::MissingName));
        assert_eq!(bill, before);
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let mut bill = OpenBill::new();
        for qty in ["0", "-1", "two"] {
            let err = bill.add("Soap", qty, "10").unwrap_err();
            assert!(
                matches!(
                    err,
                    CoreError::Validation(ValidationError::InvalidQuantityOrPrice {
                        field: InputField::Quantity,
                        ..
                    })
                ),
                "qty {qty:?} gave {err:?}"
            );
        }
        assert!(bill.is_empty());
        assert_eq!(bill.subtotal(), Money::zero());
    }

    #[test]
    fn test_invalid_price_rejected() {
        let mut bill = OpenBill::new();
        let err = bill.add("Soap", "1", "-10").unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation(ValidationError::invalid(InputField::UnitPrice, "-10"))
        );
        assert!(bill.is_empty());
    }

    #[test]
    fn test_quantity_checked_before_name() {
        let mut bill = OpenBill::new();
        let err = bill.add("", "abc", "10").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidQuantityOrPrice { .. })
        ));
    }

    #[test]
    fn test_overflowing_line_total_rejected() {
        let mut bill = soap_and_oil();
        let before = bill.clone();

        let huge = Decimal::MAX.to_string();
        let err = bill.add("Gold", "2", &huge).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidQuantityOrPrice {
                field: InputField::Quantity,
                ..
            })
        ));
        assert_eq!(bill, before);
    }

    #[test]
    fn test_overflowing_subtotal_rejected() {
        let mut bill = OpenBill::new();
        let huge = Decimal::MAX.to_string();
        bill.add("Gold", "1", &huge).unwrap();
        let before = bill.clone();

        let err = bill.add("Silver", "1", "1").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidQuantityOrPrice {
                field: InputField::UnitPrice,
                ..
            })
        ));
        assert_eq!(bill, before);
        assert_eq!(bill.close(gst()), Err(CoreError::AmountOverflow));
    }

    #[test]
    fn test_close_computes_gst_scenario() {
        let bill = soap_and_oil();
        let closed = bill.close(gst()).unwrap();

        assert_eq!(closed.totals.subtotal, Money::new(dec!(220)));
        assert_eq!(closed.totals.tax, Money::new(dec!(39.60)));
        assert_eq!(closed.totals.total, Money::new(dec!(259.60)));
        assert_eq!(closed.items_summary, "Soap(2x50.00); Oil(1x120.00)");
        assert_eq!(closed.items.len(), 2);
        assert_eq!(closed.created_at.timestamp_subsec_nanos(), 0);

        // close is pure
        assert_eq!(bill.item_count(), 2);
    }

    #[test]
    fn test_close_empty_bill_fails() {
        let bill = OpenBill::new();
        assert_eq!(bill.close(TaxRate::default()), Err(CoreError::EmptyBill));
    }

    #[test]
    fn test_preview_matches_close() {
        let bill = soap_and_oil();
        let rate = TaxRate::from_percent(dec!(8.25));
        assert_eq!(bill.preview(rate), Some(bill.close(rate).unwrap().totals));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut bill = soap_and_oil();

        bill.reset();
        let once = bill.clone();
        bill.reset();

        assert_eq!(bill, once);
        assert_eq!(bill, OpenBill::new());
        assert_eq!(bill.subtotal(), Money::zero());
    }

    #[test]
    fn test_summarize_items_empty() {
        assert_eq!(summarize_items(&[]), "");
    }
}
