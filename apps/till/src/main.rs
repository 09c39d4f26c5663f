//! # Tally Till Entry Point
//!
//! ```text
//! $ till --tax-rate 18
//! Tally Billing | tax 18% | type 'help' for commands
//! > add Soap 2 50
//! > add Oil 1 120
//! > bill
//! Bill #1 saved
//! ```
//!
//! One user, one command at a time: a current-thread runtime is enough.

use clap::Parser;

use till::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The actual setup is in lib.rs for better testability
    till::run(Cli::parse()).await
}
