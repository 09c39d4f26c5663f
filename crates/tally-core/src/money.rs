//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:   220.0 * 0.18 = 39.599999999999994  ❌                   │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal, exact base-10 arithmetic                   │
//! │    220 * 18 / 100 = 39.6 exactly  ✅                                    │
//! │                                                                         │
//! │  Prices, line totals and subtotals are never rounded.                   │
//! │  Only tax is rounded, half away from zero, to two places.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let price = Money::parse("101.125").unwrap();
//! assert_eq!(price.amount(), dec!(101.125));
//! assert_eq!(price.to_string(), "101.125");
//! assert_eq!(Money::parse("50").unwrap().to_string(), "50.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::TaxRate;

/// Decimal places tax is rounded to.
pub const TAX_DECIMAL_PLACES: u32 = 2;

/// A monetary amount, exact to whatever precision it was entered with.
///
/// Signed so a malformed negative input can be represented long enough to be
/// rejected by validation; amounts stored on a bill are never negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Parses a decimal amount: `"120"`, `"50.0"`, `"101.125"`, `"1e2"`.
    ///
    /// `None` for anything that is not a finite number.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::parse("1e2").map(|m| m.amount()), Some(dec!(100)));
    /// assert_eq!(Money::parse("0.005").map(|m| m.amount()), Some(dec!(0.005)));
    /// assert_eq!(Money::parse("inf"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        parse_decimal(input).map(Money)
    }

    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let line_total = Money::parse("50").unwrap().checked_mul_quantity(2);
    /// assert_eq!(line_total, Money::parse("100"));
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, quantity: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Calculates tax at the given rate, rounded half away from zero to two
    /// decimal places.
    ///
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::types::TaxRate;
    /// use rust_decimal_macros::dec;
    ///
    /// let subtotal = Money::parse("220").unwrap();
    /// let tax = subtotal.calculate_tax(TaxRate::from_percent(dec!(18))).unwrap();
    /// assert_eq!(tax.amount(), dec!(39.60));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        let tax = self
            .0
            .checked_mul(rate.percent())?
            .checked_div(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(TAX_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        Some(Money(tax))
    }
}

/// At least two decimal places, more only when the amount has them:
/// `"220.00"`, `"39.60"`, `"101.125"`.
///
/// No currency symbol: the front end decides how to present currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.normalize();
        if value.scale() <= TAX_DECIMAL_PLACES {
            write!(f, "{:.2}", value)
        } else {
            write!(f, "{}", value)
        }
    }
}

/// Reads back an amount written with [`Money::amount`]'s `to_string()`.
impl TryFrom<String> for Money {
    type Error = rust_decimal::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Decimal::from_str(value.trim()).map(Money)
    }
}

/// Parses plain (`"8.25"`) or scientific (`"1e2"`) decimal notation.
///
/// Negative zero is normalized to zero.
pub(crate) fn parse_decimal(input: &str) -> Option<Decimal> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    let value = if s.contains(['e', 'E']) {
        Decimal::from_scientific(&s.to_ascii_lowercase()).ok()?
    } else {
        Decimal::from_str(s).ok()?
    };

    Some(if value.is_zero() { Decimal::ZERO } else { value })
}
