//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--tax-rate`, `--db`, ...)
//! 2. Environment variables (`TALLY_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only once the session starts. The `rate` command
//! changes the session's rate, not this struct.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use tally_core::validation::parse_tax_rate;
use tally_core::{Money, TaxRate};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the banner)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Tax rate applied when a bill is finalized, until changed with `rate`.
    pub default_tax_rate: TaxRate,

    /// Explicit database file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Tally Billing"
    /// - Currency: ₹
    /// - Tax: 18%
    /// - Database: platform data directory
    fn default() -> Self {
        ConfigState {
            store_name: "Tally Billing".to_string(),
            currency_symbol: "₹".to_string(),
            default_tax_rate: TaxRate::default(),
            database_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TALLY_DB_PATH`: Database file
    /// - `TALLY_TAX_RATE`: Default tax rate in percent (e.g., "18" or "8.25")
    /// - `TALLY_STORE_NAME`: Store name
    /// - `TALLY_CURRENCY_SYMBOL`: Currency symbol
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("TALLY_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(rate) = lookup("TALLY_TAX_RATE") {
            match parse_tax_rate(&rate) {
                Ok(rate) => config.default_tax_rate = rate,
                Err(e) => warn!(error = %e, "Ignoring TALLY_TAX_RATE"),
            }
        }

        if let Some(store_name) = lookup("TALLY_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("TALLY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// config.format_currency(Money::new(dec!(259.6))) // "₹259.60"
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{}{}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{}", self.currency_symbol, amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(|_| None);
        assert_eq!(config.default_tax_rate.percent(), dec!(18));
        assert_eq!(config.store_name, "Tally Billing");
        assert_eq!(config.currency_symbol, "₹");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup_from(&[
            ("TALLY_DB_PATH", "/var/lib/tally/bills.db"),
            ("TALLY_TAX_RATE", "8.25"),
            ("TALLY_STORE_NAME", "Corner Shop"),
            ("TALLY_CURRENCY_SYMBOL", "$"),
        ]));

        assert_eq!(config.database_path, Some(PathBuf::from("/var/lib/tally/bills.db")));
        assert_eq!(config.default_tax_rate.percent(), dec!(8.25));
        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_bad_tax_rate_keeps_default() {
        let config = ConfigState::from_lookup(lookup_from(&[("TALLY_TAX_RATE", "eighteen")]));
        assert_eq!(config.default_tax_rate.percent(), dec!(18));

        let config = ConfigState::from_lookup(lookup_from(&[("TALLY_TAX_RATE", "250")]));
        assert_eq!(config.default_tax_rate.percent(), dec!(18));
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::new(dec!(259.6))), "₹259.60");
        assert_eq!(config.format_currency(Money::zero()), "₹0.00");
        assert_eq!(config.format_currency(Money::new(dec!(101.125))), "₹101.125");
        assert_eq!(config.format_currency(Money::new(dec!(-5.5))), "-₹5.50");
    }
}
