//! # Database Migrations
//!
//! Embedded SQL migrations for Tally POS.
//!
//! Schema creation is an explicit bootstrap step: [`Database::new`] runs it
//! once when the store is opened (unless disabled in [`DbConfig`]), and no
//! runtime operation ever issues DDL.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql` (e.g., `003_add_customer.sql`)
//! 3. **NEVER** modify existing migrations - always add new ones
//!
//! [`Database::new`]: crate::pool::Database::new
//! [`DbConfig`]: crate::pool::DbConfig

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
///
/// ```text
/// migrations/sqlite/
/// ├── 001_create_bills.sql       # bills table
/// └── 002_create_bill_items.sql  # structured line items
/// ```
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent: applied migrations are tracked in `_sqlx_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
///
/// Reports zero applied when the migrations table does not exist yet; any
/// other failure is returned.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if tracked == 0 {
        return Ok((total, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_status_before_and_after_migrating() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert_eq!(migration_status(db.pool()).await.unwrap(), (MIGRATOR.migrations.len(), 0));

        run_migrations(db.pool()).await.unwrap();
        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_status_propagates_query_errors() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let result = migration_status(db.pool()).await;
        assert!(matches!(result, Err(DbError::ConnectionFailed(_))));
    }
}
