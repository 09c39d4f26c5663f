//! # Repository Module
//!
//! Database repository implementations for Tally POS.
//!
//! ```text
//! BillSession
//!      │  db.bills().store(&new_bill)
//!      ▼
//! BillRepository
//! ├── store(&self, bill)
//! ├── list_all(&self)
//! ├── get_by_id(&self, id)
//! ├── items_for(&self, bill_id)
//! └── count(&self)
//!      │  SQL
//!      ▼
//! SQLite (bills, bill_items)
//! ```
//!
//! ## Available Repositories
//!
//! - [`BillRepository`](bill::BillRepository) - The append-only bill ledger

pub mod bill;
