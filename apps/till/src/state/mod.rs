//! # State Module
//!
//! Process-wide state for the till.
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │     BillSession      │      │     ConfigState      │
//! │                      │      │                      │
//! │  OpenBill (memory)   │      │  store_name          │
//! │  BillRepository ─────┼──►   │  currency_symbol     │
//! │    (SQLite ledger)   │      │  default_tax_rate    │
//! └──────────────────────┘      └──────────────────────┘
//!   mutated by commands            read-only after startup
//! ```

mod config;
mod session;

pub use config::ConfigState;
pub use session::BillSession;
