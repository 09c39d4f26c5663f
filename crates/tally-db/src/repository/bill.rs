//! # Bill Repository
//!
//! The ledger: append-only storage for finalized bills.
//!
//! ## Store
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store(NewBill)                                                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT INTO bills (...)          → id = last_insert_rowid()          │
//! │    INSERT INTO bill_items (id, 0..) → one row per line item             │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls back both tables: a bill is stored whole or not at   │
//! │  all. Ids come from AUTOINCREMENT and are never handed out twice.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use tally_core::{BillItem, FinalizedBill, NewBill};

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Stores a closed bill and its line items, assigning the next id.
    ///
    /// ## Returns
    /// The stored record, identical to what [`list_all`](Self::list_all)
    /// will return for it.
    pub async fn store(&self, bill: &NewBill) -> DbResult<FinalizedBill> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO bills (
                created_at, items_summary,
                subtotal, tax, total, tax_rate
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6
            )
            "#,
        )
        .bind(bill.created_at)
        .bind(&bill.items_summary)
        .bind(bill.totals.subtotal.amount().to_string())
        .bind(bill.totals.tax.amount().to_string())
        .bind(bill.totals.total.amount().to_string())
        .bind(bill.totals.tax_rate.percent().to_string())
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();

        for (position, item) in bill.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO bill_items (
                    bill_id, position, name,
                    quantity, unit_price, line_total
                ) VALUES (
                    ?1, ?2, ?3,
                    ?4, ?5, ?6
                )
                "#,
            )
            .bind(id)
            .bind(position as i64)
            .bind(item.name())
            .bind(item.quantity())
            .bind(item.unit_price().amount().to_string())
            .bind(item.line_total().amount().to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id,
            items = bill.items.len(),
            total = %bill.totals.total,
            "Bill stored"
        );

        Ok(bill.assign_id(id))
    }

    /// Lists every stored bill, newest (highest id) first.
    pub async fn list_all(&self) -> DbResult<Vec<FinalizedBill>> {
        let bills: Vec<FinalizedBill> = sqlx::query_as(
            r#"
            SELECT
                id,
                created_at,
                items_summary,
                subtotal,
                tax,
                total,
                tax_rate
            FROM bills
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = bills.len(), "Listed bills");
        Ok(bills)
    }

    /// Gets a bill by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<FinalizedBill>> {
        let bill: Option<FinalizedBill> = sqlx::query_as(
            r#"
            SELECT
                id,
                created_at,
                items_summary,
                subtotal,
                tax,
                total,
                tax_rate
            FROM bills
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Gets the structured line items of a bill, in the order they were rung
    /// up. Empty if the bill does not exist.
    pub async fn items_for(&self, bill_id: i64) -> DbResult<Vec<BillItem>> {
        let items: Vec<BillItem> = sqlx::query_as(
            r#"
            SELECT
                bill_id,
                position,
                name,
                quantity,
                unit_price,
                line_total
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY position
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Number of stored bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
