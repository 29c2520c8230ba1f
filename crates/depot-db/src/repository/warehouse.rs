//! # Warehouse Repository
//!
//! Database operations for the warehouse catalog.
//!
//! ## Copy-Create
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create(name, copy_items_from)                        │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │   ├── INSERT INTO warehouses (name, ...)                               │
//! │   └── INSERT INTO items SELECT new_id, id, name, 0, other              │
//! │          FROM items WHERE warehouse_id = <source>                      │
//! │  COMMIT ← the new warehouse appears with all copies or not at all      │
//! │                                                                         │
//! │  Source "Main"              New "Annex"                                │
//! │  ┌────┬───────┬─────┐       ┌────┬───────┬─────┐                       │
//! │  │ id │ name  │ qty │       │ id │ name  │ qty │                       │
//! │  ├────┼───────┼─────┤  ──►  ├────┼───────┼─────┤                       │
//! │  │  1 │ Bolt  │   5 │       │  1 │ Bolt  │   0 │                       │
//! │  │  2 │ Nut   │   3 │       │  2 │ Nut   │   0 │                       │
//! │  └────┴───────┴─────┘       └────┴───────┴─────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use depot_core::{Warehouse, WarehouseName};

/// Catalog row as stored.
#[derive(Debug, sqlx::FromRow)]
struct WarehouseRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl WarehouseRow {
    fn into_warehouse(self) -> DbResult<Warehouse> {
        let name = WarehouseName::parse(&self.name).map_err(|e| {
            DbError::Internal(format!("stored warehouse name '{}' is invalid: {}", self.name, e))
        })?;

        Ok(Warehouse {
            id: self.id,
            name,
            created_at: self.created_at,
        })
    }
}

/// Repository for warehouse catalog operations.
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    pool: SqlitePool,
}

impl WarehouseRepository {
    /// Creates a new WarehouseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WarehouseRepository { pool }
    }

    /// Lists every warehouse in creation order.
    pub async fn list(&self) -> DbResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, name, created_at
            FROM warehouses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WarehouseRow::into_warehouse).collect()
    }

    /// Lists warehouse names in creation order.
    pub async fn names(&self) -> DbResult<Vec<WarehouseName>> {
        Ok(self.list().await?.into_iter().map(|w| w.name).collect())
    }

    /// Gets a warehouse by its exact stored name.
    ///
    /// ## Returns
    /// * `Ok(Some(Warehouse))` - Warehouse found
    /// * `Ok(None)` - No warehouse with that name
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Warehouse>> {
        let row = sqlx::query_as::<_, WarehouseRow>(
            r#"
            SELECT id, name, created_at
            FROM warehouses
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WarehouseRow::into_warehouse).transpose()
    }

    /// Returns true if a warehouse with this exact name exists.
    pub async fn exists(&self, name: &str) -> DbResult<bool> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM warehouses WHERE name = ?1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists != 0)
    }

    /// Creates a warehouse, optionally cloning the item list of another one.
    ///
    /// Copied items keep their name, id and notes; every quantity is 0.
    /// Both steps run in one transaction.
    ///
    /// ## Returns
    /// * `Ok(Warehouse)` - The new catalog entry
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn create(
        &self,
        name: &WarehouseName,
        copy_items_from: Option<&WarehouseName>,
    ) -> DbResult<Warehouse> {
        debug!(name = %name, copy_from = ?copy_items_from.map(|w| w.as_str()), "Creating warehouse");

        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let id = sqlx::query(
            r#"
            INSERT INTO warehouses (name, last_item_id, created_at)
            VALUES (?1, 0, ?2)
            "#,
        )
        .bind(name.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name.as_str()),
            other => other,
        })?
        .last_insert_rowid();

        if let Some(source) = copy_items_from {
            let copied = sqlx::query(
                r#"
                INSERT INTO items (warehouse_id, id, name, quantity, other)
                SELECT ?1, i.id, i.name, 0, i.other
                FROM items i
                JOIN warehouses w ON w.id = i.warehouse_id
                WHERE w.name = ?2
                ORDER BY i.id
                "#,
            )
            .bind(id)
            .bind(source.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            debug!(name = %name, source = %source, copied, "Copied item types");
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Warehouse {
            id,
            name: name.clone(),
            created_at: now,
        })
    }

    /// Deletes a warehouse and, through the foreign key cascade, its items.
    ///
    /// ## Returns
    /// * `Ok(true)` - Warehouse removed
    /// * `Ok(false)` - No warehouse had that name
    pub async fn delete(&self, name: &WarehouseName) -> DbResult<bool> {
        debug!(name = %name, "Deleting warehouse");

        let result = sqlx::query("DELETE FROM warehouses WHERE name = ?1")
            .bind(name.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts warehouses (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM warehouses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
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

    fn name(raw: &str) -> WarehouseName {
        WarehouseName::parse(raw).unwrap()
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_in_creation_order() {
        let db = db().await;
        let repo = db.warehouses();

        repo.create(&name("Zeta"), None).await.unwrap();
        repo.create(&name("Alpha"), None).await.unwrap();

        let names = repo.names().await.unwrap();
        assert_eq!(names, vec![name("Zeta"), name("Alpha")]);
        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.exists("Alpha").await.unwrap());
        assert!(!repo.exists("alpha").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let db = db().await;
        let repo = db.warehouses();

        repo.create(&name("Main"), None).await.unwrap();
        let err = repo.create(&name("Main"), None).await.unwrap_err();

        assert!(err.is_unique_violation());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_copy_create_zeroes_quantities() {
        let db = db().await;
        let main = name("Main");
        db.warehouses().create(&main, None).await.unwrap();
        db.items()
            .insert(&main, &NewItem::new("Bolt", 5, "steel"))
            .await
            .unwrap();
        db.items()
            .insert(&main, &NewItem::new("Nut", 3, ""))
            .await
            .unwrap();

        let annex = name("Annex");
        db.warehouses().create(&annex, Some(&main)).await.unwrap();

        let copied = db.items().list(&annex).await.unwrap();
        assert_eq!(copied.len(), 2);
        assert_eq!(copied[0].name, "Bolt");
        assert_eq!(copied[0].other, "steel");
        assert_eq!(copied[1].name, "Nut");
        assert!(copied.iter().all(|item| item.quantity == 0));

        // The source keeps its stock.
        let source = db.items().list(&main).await.unwrap();
        assert_eq!(source[0].quantity, 5);
        assert_eq!(source[1].quantity, 3);
    }

    #[tokio::test]
    async fn test_delete_cascades_items() {
        let db = db().await;
        let main = name("Main");
        db.warehouses().create(&main, None).await.unwrap();
        db.items()
            .insert(&main, &NewItem::new("Bolt", 5, ""))
            .await
            .unwrap();

        assert!(db.warehouses().delete(&main).await.unwrap());
        assert!(!db.warehouses().delete(&main).await.unwrap());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);

        // Re-creating the name yields an empty warehouse.
        db.warehouses().create(&main, None).await.unwrap();
        assert!(db.items().list(&main).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let db = db().await;
        let created = db.warehouses().create(&name("Main"), None).await.unwrap();

        let found = db.warehouses().get_by_name("Main").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, created.name);
        assert!(db.warehouses().get_by_name("Other").await.unwrap().is_none());
    }
}
