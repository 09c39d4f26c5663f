//! Command-line flags. Each flag overrides its `TALLY_*` variable.

use clap::Parser;
use std::path::PathBuf;

use tally_core::validation::parse_tax_rate;
use tally_core::TaxRate;

use crate::state::ConfigState;

#[derive(Debug, Default, Parser)]
#[command(name = "till", version, about = "Point-of-sale billing at the terminal")]
pub struct Cli {
    /// Bills database file [env: TALLY_DB_PATH] (default: platform data directory)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Tax rate in percent for finalized bills [env: TALLY_TAX_RATE] (default: 18)
    #[arg(long, value_name = "PERCENT", value_parser = parse_tax_rate)]
    pub tax_rate: Option<TaxRate>,

    /// Store name shown at startup [env: TALLY_STORE_NAME]
    #[arg(long, value_name = "NAME")]
    pub store_name: Option<String>,

    /// Currency symbol for amounts [env: TALLY_CURRENCY_SYMBOL]
    #[arg(long, value_name = "SYMBOL")]
    pub currency_symbol: Option<String>,
}

impl Cli {
    /// Applies the flags that were given on top of `config`.
    pub fn apply(self, mut config: ConfigState) -> ConfigState {
        if let Some(db) = self.db {
            config.database_path = Some(db);
        }
        if let Some(rate) = self.tax_rate {
            config.default_tax_rate = rate;
        }
        if let Some(store_name) = self.store_name {
            config.store_name = store_name;
        }
        if let Some(symbol) = self.currency_symbol {
            config.currency_symbol = symbol;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["till", "--tax-rate", "12.5", "--db", "bills.db"]).unwrap();
        let config = cli.apply(ConfigState::default());

        assert_eq!(config.default_tax_rate.percent(), dec!(12.5));
        assert_eq!(config.database_path, Some(PathBuf::from("bills.db")));
        assert_eq!(config.store_name, "Tally Billing");
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut base = ConfigState::default();
        base.currency_symbol = "$".to_string();

        let config = Cli::try_parse_from(["till"]).unwrap().apply(base);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.default_tax_rate.percent(), dec!(18));
    }

    #[test]
    fn test_invalid_tax_rate_flag() {
        assert!(Cli::try_parse_from(["till", "--tax-rate", "101"]).is_err());
        assert!(Cli::try_parse_from(["till", "--tax-rate", "abc"]).is_err());
    }
}
