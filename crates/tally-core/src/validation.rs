//! # Validation Module
//!
//! Parse-and-validate functions for the raw text fields of the billing form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One function per field                             │
//! │                                                                         │
//! │  "  Soap "  ──► parse_name        ──► "Soap"        | MissingName       │
//! │  "2"        ──► parse_quantity    ──► 2             | InvalidQuantity.. │
//! │  "50.0"     ──► parse_unit_price  ──► Money(50.0)   | InvalidQuantity.. │
//! │  "18"       ──► parse_tax_rate    ──► TaxRate(18)   | InvalidTaxRate    │
//! │                                                                         │
//! │  Every failure is a distinct typed error; nothing is caught-and-        │
//! │  guessed. Callers validate all fields BEFORE mutating any state.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::error::{InputField, ValidationError};
use crate::money::{parse_decimal, Money};
use crate::types::TaxRate;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound for a tax rate: 100%.
pub const MAX_TAX_RATE_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Validates an item name.
///
/// ## Returns
/// The trimmed name.
///
/// ```rust
/// use tally_core::validation::parse_name;
///
/// assert_eq!(parse_name("  Soap ").unwrap(), "Soap");
/// assert!(parse_name("   ").is_err());
/// ```
pub fn parse_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    Ok(name.to_string())
}

/// Parses a quantity: a whole number greater than zero.
///
/// ```rust
/// use tally_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity("3").unwrap(), 3);
/// assert!(parse_quantity("0").is_err());
/// assert!(parse_quantity("-1").is_err());
/// assert!(parse_quantity("1.5").is_err());
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let quantity: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid(InputField::Quantity, input))?;

    if quantity <= 0 {
        return Err(ValidationError::invalid(InputField::Quantity, input));
    }

    Ok(quantity)
}

/// Parses a unit price: any non-negative decimal amount, zero allowed.
///
/// The price is kept exactly as entered; nothing is rounded here.
///
/// ```rust
/// use tally_core::validation::parse_unit_price;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_unit_price("50.0").unwrap().amount(), dec!(50));
/// assert_eq!(parse_unit_price("101.125").unwrap().amount(), dec!(101.125));
/// assert!(parse_unit_price("-10").is_err());
/// assert!(parse_unit_price("ten").is_err());
/// ```
pub fn parse_unit_price(input: &str) -> ValidationResult<Money> {
    let price =
        Money::parse(input).ok_or_else(|| ValidationError::invalid(InputField::UnitPrice, input))?;

    if price.is_negative() {
        return Err(ValidationError::invalid(InputField::UnitPrice, input));
    }

    Ok(price)
}

/// Parses a tax percentage such as `"18"` or `"8.25"` into a [`TaxRate`].
///
/// Must be between 0 and 100 inclusive.
pub fn parse_tax_rate(input: &str) -> ValidationResult<TaxRate> {
    let invalid = || ValidationError::InvalidTaxRate {
        input: input.to_string(),
    };

    let percent = parse_decimal(input).ok_or_else(invalid)?;
    validate_tax_rate(percent).map_err(|_| invalid())?;

    Ok(TaxRate::from_percent(percent))
}

/// Validates a tax percentage (0 to 100).
pub fn validate_tax_rate(percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > MAX_TAX_RATE_PERCENT {
        return Err(ValidationError::InvalidTaxRate {
            input: percent.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("Soap").unwrap(), "Soap");
        assert_eq!(parse_name("\tCoconut  Oil \n").unwrap(), "Coconut  Oil");
        assert_eq!(parse_name(""), Err(ValidationError::MissingName));
        assert_eq!(parse_name("   "), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
        assert_eq!(parse_quantity("+4").unwrap(), 4);

        for input in ["0", "-1", "", "abc", "2.0", "1e2", "99999999999999999999"] {
            assert_eq!(
                parse_quantity(input),
                Err(ValidationError::invalid(InputField::Quantity, input)),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_unit_price() {
        assert_eq!(parse_unit_price("120").unwrap().amount(), dec!(120));
        assert_eq!(parse_unit_price("0.99").unwrap().amount(), dec!(0.99));
        assert_eq!(parse_unit_price("-0").unwrap(), Money::zero());

        for input in ["-0.01", "", "free", "nan", "-1e2"] {
            assert_eq!(
                parse_unit_price(input),
                Err(ValidationError::invalid(InputField::UnitPrice, input)),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_unit_price_beyond_two_places_and_scientific() {
        assert_eq!(parse_unit_price("101.125").unwrap().amount(), dec!(101.125));
        assert_eq!(parse_unit_price("0.005").unwrap().amount(), dec!(0.005));
        assert_eq!(parse_unit_price("1e2").unwrap().amount(), dec!(100));
        assert_eq!(parse_unit_price("1.5E1").unwrap().amount(), dec!(15));
    }

    #[test]
    fn test_parse_tax_rate() {
        assert_eq!(parse_tax_rate("18").unwrap().percent(), dec!(18));
        assert_eq!(parse_tax_rate("18.0").unwrap().percent(), dec!(18));
        assert_eq!(parse_tax_rate("8.25").unwrap().percent(), dec!(8.25));
        assert_eq!(parse_tax_rate("8.125").unwrap().percent(), dec!(8.125));
        assert_eq!(parse_tax_rate("0").unwrap(), TaxRate::zero());
        assert_eq!(parse_tax_rate("100").unwrap().percent(), dec!(100));

        for input in ["-1", "100.01", "abc", ""] {
            assert!(
                matches!(parse_tax_rate(input), Err(ValidationError::InvalidTaxRate { .. })),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(dec!(0)).is_ok());
        assert!(validate_tax_rate(dec!(18)).is_ok());
        assert!(validate_tax_rate(dec!(100)).is_ok());
        assert!(validate_tax_rate(dec!(100.001)).is_err());
        assert!(validate_tax_rate(dec!(-0.5)).is_err());
    }
}
