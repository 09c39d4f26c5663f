//! # Tally Till
//!
//! Terminal front end for Tally POS billing.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Till                                     │
//! │                                                                         │
//! │  main.rs ─────► parses flags, runs `run()` on a current-thread runtime │
//! │                                                                         │
//! │  lib.rs ──────► logging, config, database path, startup/shutdown       │
//! │                                                                         │
//! │  commands.rs ─► add, show, rate, bill, reset, history, items           │
//! │                                                                         │
//! │  state/ ──────► BillSession (open bill + ledger), ConfigState          │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  tally.db (local file, WAL mode)                                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (defaults, `TALLY_*` env, flags)
//! 3. Determine database path (app data directory)
//! 4. Connect to database & run migrations
//! 5. Read commands from stdin until `quit` or end of input
//! 6. Close the database

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tally_db::{Database, DbConfig};

use cli::Cli;
use commands::Till;
use state::{BillSession, ConfigState};

const DATABASE_FILE: &str = "tally.db";

/// Runs the till until the user quits.
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Tally till");

    let config = cli.apply(ConfigState::from_env());
    let db_path = get_database_path(&config)?;
    info!(path = %db_path.display(), tax_rate = %config.default_tax_rate, "Configuration loaded");

    let db = Database::new(DbConfig::new(db_path)).await?;

    let mut till = Till::new(BillSession::new(db.bills()), config);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = till.run(stdin.lock(), stdout.lock()).await;

    db.close().await;
    result?;

    info!("Till closed");
    Ok(())
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - Default: `warn`, so log lines stay out of the way of the prompt
/// - `RUST_LOG=till=debug,tally=debug` for per-command detail
///
/// Logs go to stderr; stdout belongs to the till.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.tally.till/tally.db`
/// - **Windows**: `%APPDATA%\tally\till\data\tally.db`
/// - **Linux**: `~/.local/share/till/tally.db`
///
/// `TALLY_DB_PATH` or `--db` take precedence.
fn get_database_path(config: &ConfigState) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "tally", "till")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join(DATABASE_FILE))
}
