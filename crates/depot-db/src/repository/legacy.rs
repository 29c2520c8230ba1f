//! # Legacy Table Import
//!
//! Older Depot database files kept one table per warehouse, named after the
//! warehouse, each with the columns `name, id, quantity, other`. This module
//! folds such tables into the `warehouses` catalog and the shared `items`
//! table.
//!
//! ## Import Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_aside_colliding_tables()   (before migrations)                    │
//! │   legacy-shaped "items"      → renamed "legacy items"                  │
//! │   legacy-shaped "warehouses" → renamed "legacy warehouses"             │
//! │                                                                         │
//! │                         import_all()                                    │
//! │                                                                         │
//! │  sqlite_master ── user tables, oldest first                            │
//! │       │                                                                 │
//! │       ├── sqlite_%, _sqlx_migrations, warehouses, items → not candidates│
//! │       ├── columns ≠ {name, id, quantity, other}       → not candidates │
//! │       ├── "legacy items" / "legacy warehouses"        → imported as    │
//! │       │                                                 items / warehouses
//! │       ├── name is not a valid WarehouseName           → warn!, skip    │
//! │       ├── name already in the catalog                 → warn!, skip    │
//! │       ▼                                                                 │
//! │  per table, one transaction:                                            │
//! │   BEGIN                                                                 │
//! │    ├── INSERT INTO warehouses (last_item_id = sqlite_sequence.seq)     │
//! │    ├── INSERT INTO items SELECT ... FROM "<table>" ORDER BY rowid      │
//! │    └── DROP TABLE "<table>"                                            │
//! │   COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Table names are the only identifiers ever spliced into SQL. They come
//! from `sqlite_master` (or are one of the fixed names above), and are
//! quoted with [`quote_identifier`].
//!
//! Older files could hold a warehouse called `items` or `warehouses`. Such a
//! table would shadow the schema table of the same name, so it is renamed
//! before migrations run. Set-aside names contain a space, which no
//! importable warehouse table has.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations::MIGRATIONS_TABLE;
use depot_core::WarehouseName;

/// Columns a table must have, exactly, to be imported.
const LEGACY_COLUMNS: [&str; 4] = ["id", "name", "other", "quantity"];

/// Schema tables a legacy warehouse table may be named after.
const SCHEMA_TABLES: [&str; 2] = ["warehouses", "items"];

const SET_ASIDE_PREFIX: &str = "legacy ";

/// The warehouse a legacy table holds: its own name, or the name it had
/// before being set aside.
fn warehouse_name_of(table: &str) -> &str {
    match table.strip_prefix(SET_ASIDE_PREFIX) {
        Some(original) if SCHEMA_TABLES.contains(&original) => original,
        _ => table,
    }
}

/// Quotes an SQLite identifier, doubling embedded double quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Imports table-per-warehouse data into the catalog.
#[derive(Debug, Clone)]
pub struct LegacyImporter {
    pool: SqlitePool,
}

impl LegacyImporter {
    /// Creates a new LegacyImporter.
    pub fn new(pool: SqlitePool) -> Self {
        LegacyImporter { pool }
    }

    /// Renames legacy warehouse tables called `items` or `warehouses` out of
    /// the schema's way. Run before migrations; a no-op once the schema
    /// exists.
    ///
    /// ## Returns
    /// The new names of the tables that were moved.
    pub async fn set_aside_colliding_tables(&self) -> DbResult<Vec<String>> {
        let mut moved = Vec::new();

        for table in SCHEMA_TABLES {
            if !self.has_legacy_columns(table).await? {
                continue;
            }

            let target = format!("{SET_ASIDE_PREFIX}{table}");
            sqlx::query(&format!(
                "ALTER TABLE {} RENAME TO {}",
                quote_identifier(table),
                quote_identifier(&target)
            ))
            .execute(&self.pool)
            .await?;

            info!(table, renamed = %target, "Set aside legacy warehouse table");
            moved.push(target);
        }

        Ok(moved)
    }

    /// Lists user tables shaped like a legacy warehouse, oldest first.
    pub async fn candidate_tables(&self) -> DbResult<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table'
            AND name NOT LIKE 'sqlite_%'
            AND name NOT IN (?1, 'warehouses', 'items')
            ORDER BY rowid
            "#,
        )
        .bind(MIGRATIONS_TABLE)
        .fetch_all(&self.pool)
        .await?;

        let mut candidates = Vec::new();
        for table in tables {
            if self.has_legacy_columns(&table).await? {
                candidates.push(table);
            } else {
                debug!(table = %table, "Ignoring table with foreign layout");
            }
        }

        Ok(candidates)
    }

    async fn has_legacy_columns(&self, table: &str) -> DbResult<bool> {
        let mut columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info(?1)")
                .bind(table)
                .fetch_all(&self.pool)
                .await?;

        columns.iter_mut().for_each(|c| c.make_ascii_lowercase());
        columns.sort();

        Ok(columns == LEGACY_COLUMNS)
    }

    /// Imports every eligible legacy table.
    ///
    /// ## Returns
    /// The names of the warehouses created, in import order.
    pub async fn import_all(&self) -> DbResult<Vec<WarehouseName>> {
        let mut imported = Vec::new();

        for table in self.candidate_tables().await? {
            let raw = warehouse_name_of(&table);
            let name = match WarehouseName::parse(raw) {
                Ok(name) if name == raw => name,
                Ok(_) | Err(_) => {
                    warn!(table = %table, "Skipping legacy table: not a valid warehouse name");
                    continue;
                }
            };

            let taken: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM warehouses WHERE name = ?1)")
                    .bind(name.as_str())
                    .fetch_one(&self.pool)
                    .await?;

            if taken != 0 {
                warn!(table = %table, "Skipping legacy table: warehouse already exists");
                continue;
            }

            let rows = self.import_table(&table, &name).await?;
            info!(warehouse = %name, rows, "Imported legacy warehouse table");
            imported.push(name);
        }

        Ok(imported)
    }

    async fn import_table(&self, table: &str, name: &WarehouseName) -> DbResult<u64> {
        let quoted = quote_identifier(table);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // The old table's AUTOINCREMENT counter becomes the warehouse's
        // id floor, so ids freed before the import stay retired.
        let warehouse_id = sqlx::query(
            r#"
            INSERT INTO warehouses (name, last_item_id, created_at)
            VALUES (
                ?1,
                COALESCE((SELECT seq FROM sqlite_sequence WHERE name = ?2), 0),
                ?3
            )
            "#,
        )
        .bind(name.as_str())
        .bind(table)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let copy = format!(
            r#"
            INSERT INTO items (warehouse_id, id, name, quantity, other)
            SELECT
                ?1,
                id,
                COALESCE(name, ''),
                CAST(COALESCE(quantity, 0) AS INTEGER),
                COALESCE(other, '')
            FROM {quoted}
            WHERE id IS NOT NULL
            ORDER BY rowid
            "#
        );

        let rows = sqlx::query(&copy)
            .bind(warehouse_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query(&format!("DROP TABLE {quoted}"))
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use depot_core::NewItem;

    use crate::pool::{Database, DbConfig};

    use super::*;

    async fn legacy_table(db: &Database, table: &str) {
        let create = format!(
            "CREATE TABLE {} (name TEXT, id INTEGER PRIMARY KEY AUTOINCREMENT, quantity INTEGER, other TEXT)",
            quote_identifier(table)
        );
        sqlx::query(&create).execute(db.pool()).await.unwrap();
    }

    async fn table_exists(db: &Database, table: &str) -> bool {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        )
        .bind(table)
        .fetch_one(db.pool())
        .await
        .unwrap();
        found != 0
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("Main"), "\"Main\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[tokio::test]
    async fn test_import_moves_rows_and_drops_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        legacy_table(&db, "Old_Main").await;
        sqlx::query(
            r#"
            INSERT INTO "Old_Main" (name, quantity, other) VALUES
                ('Bolt', 5, 'steel'),
                ('Nut', NULL, NULL),
                ('Gear', -2, '')
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(r#"DELETE FROM "Old_Main" WHERE name = 'Gear'"#)
            .execute(db.pool())
            .await
            .unwrap();

        let imported = db.legacy().import_all().await.unwrap();
        let main = WarehouseName::parse("Old_Main").unwrap();
        assert_eq!(imported, vec![main.clone()]);
        assert!(!table_exists(&db, "Old_Main").await);

        let items = db.items().list(&main).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!((items[0].name.as_str(), items[0].id, items[0].quantity), ("Bolt", 1, 5));
        assert_eq!(items[0].other, "steel");
        assert_eq!((items[1].name.as_str(), items[1].quantity), ("Nut", 0));
        assert_eq!(items[1].other, "");

        // Id 3 was handed out before the import, so it stays retired.
        let pin = db.items().insert(&main, &NewItem::new("Pin", 1, "")).await.unwrap();
        assert_eq!(pin.id, 4);
    }

    #[tokio::test]
    async fn test_foreign_tables_are_left_alone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("CREATE TABLE notes (body TEXT)")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(db.legacy().import_all().await.unwrap().is_empty());
        assert!(table_exists(&db, "notes").await);
        assert_eq!(db.warehouses().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_or_taken_names_are_skipped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let main = WarehouseName::parse("Main").unwrap();
        db.warehouses().create(&main, None).await.unwrap();

        legacy_table(&db, "Main").await;
        legacy_table(&db, "Back Room").await;
        legacy_table(&db, "Annex").await;

        let imported = db.legacy().import_all().await.unwrap();
        assert_eq!(imported, vec![WarehouseName::parse("Annex").unwrap()]);

        assert!(table_exists(&db, "Main").await);
        assert!(table_exists(&db, "Back Room").await);
        assert!(!table_exists(&db, "Annex").await);
        assert_eq!(
            db.warehouses().names().await.unwrap(),
            vec![main, WarehouseName::parse("Annex").unwrap()]
        );
    }

    #[test]
    fn test_warehouse_name_of() {
        assert_eq!(warehouse_name_of("Main"), "Main");
        assert_eq!(warehouse_name_of("legacy items"), "items");
        assert_eq!(warehouse_name_of("legacy warehouses"), "warehouses");
        assert_eq!(warehouse_name_of("legacy Main"), "legacy Main");
    }

    #[tokio::test]
    async fn test_schema_named_tables_are_imported() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        legacy_table(&db, "items").await;
        legacy_table(&db, "Main").await;
        sqlx::query("INSERT INTO items (name, quantity, other) VALUES ('Bolt', 4, ''), ('Nut', 2, '')")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("DELETE FROM items WHERE name = 'Nut'")
            .execute(db.pool())
            .await
            .unwrap();

        let moved = db.legacy().set_aside_colliding_tables().await.unwrap();
        assert_eq!(moved, vec!["legacy items".to_string()]);
        db.run_migrations().await.unwrap();

        let imported = db.legacy().import_all().await.unwrap();
        let items = WarehouseName::parse("items").unwrap();
        assert_eq!(imported, vec![items.clone(), WarehouseName::parse("Main").unwrap()]);
        assert!(!table_exists(&db, "legacy items").await);

        let listed = db.items().list(&items).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!((listed[0].name.as_str(), listed[0].id, listed[0].quantity), ("Bolt", 1, 4));

        // The sequence followed the table through the rename.
        let pin = db.items().insert(&items, &NewItem::new("Pin", 1, "")).await.unwrap();
        assert_eq!(pin.id, 3);

        // With the schema in place there is nothing left to move.
        assert!(db.legacy().set_aside_colliding_tables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        legacy_table(&db, "Main").await;

        assert_eq!(db.legacy().import_all().await.unwrap().len(), 1);
        assert!(db.legacy().import_all().await.unwrap().is_empty());
    }
}
