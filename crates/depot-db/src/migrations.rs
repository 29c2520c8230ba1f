//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied by [`run_migrations`] when a [`Database`](crate::Database) opens.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   warehouses catalog + items (cascade)
//! ```
//!
//! The migrator records what it applied in `_sqlx_migrations`. That table
//! and SQLite's own `sqlite_*` tables are bookkeeping, never warehouses; the
//! legacy importer skips them by name.
//!
//! New schema changes go in a new `NNN_description.sql` file. Applied files
//! are never edited: the migrator checksums them.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Name of the bookkeeping table maintained by the migrator.
pub const MIGRATIONS_TABLE: &str = "_sqlx_migrations";

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every embedded migration not yet recorded. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, applied) = migration_status(pool).await?;
    debug!(total, applied, "Checking schema version");

    MIGRATOR.run(pool).await?;

    if applied < total {
        info!(applied = total - applied, "Schema migrations applied");
    }
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
    )
    .bind(MIGRATIONS_TABLE)
    .fetch_one(pool)
    .await?;

    if tracked == 0 {
        return Ok((total, 0));
    }

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((total, usize::try_from(applied).unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.run_migrations().await.unwrap();

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_status_before_migrations() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert!(total >= 1);
        assert_eq!(applied, 0);

        db.run_migrations().await.unwrap();
        assert_eq!(migration_status(db.pool()).await.unwrap(), (total, total));
    }
}
