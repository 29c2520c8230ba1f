//! # Item Repository
//!
//! Database operations for items, always scoped to one warehouse by name.
//!
//! ## Id Assignment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How New Item Ids Are Chosen                          │
//! │                                                                         │
//! │  warehouses.last_item_id = highest id ever handed out (starts at 0)    │
//! │  MAX(items.id)           = highest id currently present                │
//! │                                                                         │
//! │  new id = max(last_item_id, MAX(items.id)) + 1                         │
//! │                                                                         │
//! │  add Bolt  → 1        last_item_id = 1                                 │
//! │  add Nut   → 2        last_item_id = 2                                 │
//! │  delete 2                                                              │
//! │  add Gear  → 3        (2 is never reused)                              │
//! │  edit Gear id 3 → 40                                                   │
//! │  add Pin   → 41       (an edited id raises the floor)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use depot_core::{Item, NewItem, WarehouseName};

/// Result of [`ItemRepository::adjust_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The delta was applied; carries the new quantity.
    Adjusted { quantity: i64 },
    /// No item with that id in the warehouse.
    Missing,
    /// The sum does not fit in an i64; nothing was written.
    Overflow,
}

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
/// let bolt = repo.insert(&main, &NewItem::new("Bolt", 10, "steel")).await?;
/// repo.adjust_quantity(&main, bolt.id, -3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists the items of a warehouse in id order.
    ///
    /// An item whose id was edited moves to its new place. An unknown
    /// warehouse has no items.
    pub async fn list(&self, warehouse: &WarehouseName) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT name, id, quantity, other
            FROM items
            WHERE warehouse_id = (SELECT id FROM warehouses WHERE name = ?1)
            ORDER BY id
            "#,
        )
        .bind(warehouse.as_str())
        .fetch_all(&self.pool)
        .await?;

        debug!(warehouse = %warehouse, count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - No item with that id in the warehouse
    pub async fn get(&self, warehouse: &WarehouseName, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT name, id, quantity, other
            FROM items
            WHERE warehouse_id = (SELECT id FROM warehouses WHERE name = ?1)
            AND id = ?2
            "#,
        )
        .bind(warehouse.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Returns true iff the warehouse currently holds an item with this id.
    pub async fn exists(&self, warehouse: &WarehouseName, id: i64) -> DbResult<bool> {
        let exists: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM items
                WHERE warehouse_id = (SELECT id FROM warehouses WHERE name = ?1)
                AND id = ?2
            )
            "#,
        )
        .bind(warehouse.as_str())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }

    /// Inserts a new item with the next free id.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored item, including its assigned id
    /// * `Err(DbError::NotFound)` - The warehouse does not exist
    /// * `Err(DbError::IdsExhausted)` - An item already holds `i64::MAX`
    pub async fn insert(&self, warehouse: &WarehouseName, item: &NewItem) -> DbResult<Item> {
        debug!(warehouse = %warehouse, name = %item.name, "Inserting item");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let row: Option<(i64, i64, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT
                w.id,
                w.last_item_id,
                (SELECT MAX(i.id) FROM items i WHERE i.warehouse_id = w.id)
            FROM warehouses w
            WHERE w.name = ?1
            "#,
        )
        .bind(warehouse.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let (warehouse_id, last_item_id, max_id) =
            row.ok_or_else(|| DbError::not_found("Warehouse", warehouse.as_str()))?;

        let id = last_item_id
            .max(max_id.unwrap_or(0))
            .checked_add(1)
            .ok_or_else(|| DbError::IdsExhausted {
                warehouse: warehouse.to_string(),
            })?;

        sqlx::query(
            r#"
            INSERT INTO items (warehouse_id, id, name, quantity, other)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(warehouse_id)
        .bind(id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(&item.other)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE warehouses SET last_item_id = ?2 WHERE id = ?1")
            .bind(warehouse_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Item {
            name: item.name.clone(),
            id,
            quantity: item.quantity,
            other: item.other.clone(),
        })
    }

    /// Adds `delta` to an item's quantity.
    ///
    /// No bounds are enforced; the result may be negative. The read and the
    /// write happen in one transaction.
    pub async fn adjust_quantity(
        &self,
        warehouse: &WarehouseName,
        id: i64,
        delta: i64,
    ) -> DbResult<QuantityChange> {
        debug!(warehouse = %warehouse, id, delta, "Adjusting quantity");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let current: Option<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT warehouse_id, quantity
            FROM items
            WHERE warehouse_id = (SELECT id FROM warehouses WHERE name = ?1)
            AND id = ?2
            "#,
        )
        .bind(warehouse.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((warehouse_id, quantity)) = current else {
            return Ok(QuantityChange::Missing);
        };

        let Some(quantity) = quantity.checked_add(delta) else {
            return Ok(QuantityChange::Overflow);
        };

        sqlx::query("UPDATE items SET quantity = ?3 WHERE warehouse_id = ?1 AND id = ?2")
            .bind(warehouse_id)
            .bind(id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(QuantityChange::Adjusted { quantity })
    }

    /// Overwrites the item currently at `old_id` with `item` (which may carry
    /// a new id).
    ///
    /// ## Returns
    /// * `Ok(true)` - Item updated
    /// * `Ok(false)` - No item at `old_id`
    /// * `Err(DbError::UniqueViolation)` - `item.id` belongs to another item
    pub async fn update(&self, warehouse: &WarehouseName, old_id: i64, item: &Item) -> DbResult<bool> {
        debug!(warehouse = %warehouse, old_id, new_id = item.id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?3,
                id = ?4,
                quantity = ?5,
                other = ?6
            WHERE warehouse_id = (SELECT id FROM warehouses WHERE name = ?1)
            AND id = ?2
            "#,
        )
        .bind(warehouse.as_str())
        .bind(old_id)
        .bind(&item.name)
        .bind(item.id)
        .bind(item.quantity)
        .bind(&item.other)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, item.id.to_string()),
            other => other,
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes an item.
    ///
    /// ## Returns
    /// * `Ok(true)` - Item removed
    /// * `Ok(false)` - No item with that id
    pub async fn delete(&self, warehouse: &WarehouseName, id: i64) -> DbResult<bool> {
        debug!(warehouse = %warehouse, id, "Deleting item");

        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE warehouse_id = (SELECT id FROM warehouses WHERE name = ?1)
            AND id = ?2
            "#,
        )
        .bind(warehouse.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts items in a warehouse (for diagnostics).
    pub async fn count(&self, warehouse: &WarehouseName) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM items
            WHERE warehouse_id = (SELECT id FROM warehouses WHERE name = ?1)
            "#,
        )
        .bind(warehouse.as_str())
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
    use crate::pool::{Database, DbConfig};

    use super::*;

    async fn setup() -> (Database, WarehouseName) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let main = WarehouseName::parse("Main").unwrap();
        db.warehouses().create(&main, None).await.unwrap();
        (db, main)
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let (db, main) = setup().await;
        let repo = db.items();

        let bolt = repo.insert(&main, &NewItem::new("Bolt", 10, "steel")).await.unwrap();
        let nut = repo.insert(&main, &NewItem::new("Nut", 4, "")).await.unwrap();

        assert_eq!(bolt.id, 1);
        assert_eq!(nut.id, 2);
        assert_eq!(repo.list(&main).await.unwrap(), vec![bolt, nut]);
        assert_eq!(repo.count(&main).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let (db, main) = setup().await;
        let repo = db.items();

        repo.insert(&main, &NewItem::new("Bolt", 1, "")).await.unwrap();
        let nut = repo.insert(&main, &NewItem::new("Nut", 1, "")).await.unwrap();
        assert!(repo.delete(&main, nut.id).await.unwrap());

        let gear = repo.insert(&main, &NewItem::new("Gear", 1, "")).await.unwrap();
        assert_eq!(gear.id, 3);
    }

    #[tokio::test]
    async fn test_edited_id_raises_next_id() {
        let (db, main) = setup().await;
        let repo = db.items();

        let mut gear = repo.insert(&main, &NewItem::new("Gear", 1, "")).await.unwrap();
        let old_id = gear.id;
        gear.id = 40;
        assert!(repo.update(&main, old_id, &gear).await.unwrap());

        let pin = repo.insert(&main, &NewItem::new("Pin", 1, "")).await.unwrap();
        assert_eq!(pin.id, 41);
    }

    #[tokio::test]
    async fn test_insert_after_max_id_is_exhausted() {
        let (db, main) = setup().await;
        let repo = db.items();

        let mut gear = repo.insert(&main, &NewItem::new("Gear", 1, "")).await.unwrap();
        gear.id = i64::MAX;
        assert!(repo.update(&main, 1, &gear).await.unwrap());

        let err = repo
            .insert(&main, &NewItem::new("Pin", 1, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::IdsExhausted { .. }));
        assert_eq!(repo.count(&main).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_scoped_per_warehouse() {
        let (db, main) = setup().await;
        let annex = WarehouseName::parse("Annex").unwrap();
        db.warehouses().create(&annex, None).await.unwrap();

        let a = db.items().insert(&main, &NewItem::new("Bolt", 1, "")).await.unwrap();
        let b = db.items().insert(&annex, &NewItem::new("Bolt", 1, "")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 1);
        assert!(db.items().delete(&annex, 1).await.unwrap());
        assert!(db.items().exists(&main, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_into_unknown_warehouse() {
        let (db, _) = setup().await;
        let ghost = WarehouseName::parse("Ghost").unwrap();

        let err = db
            .items()
            .insert(&ghost, &NewItem::new("Bolt", 1, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(db.items().list(&ghost).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjust_quantity() {
        let (db, main) = setup().await;
        let repo = db.items();
        let bolt = repo.insert(&main, &NewItem::new("Bolt", 10, "")).await.unwrap();

        assert_eq!(
            repo.adjust_quantity(&main, bolt.id, -3).await.unwrap(),
            QuantityChange::Adjusted { quantity: 7 }
        );
        assert_eq!(
            repo.adjust_quantity(&main, bolt.id, -20).await.unwrap(),
            QuantityChange::Adjusted { quantity: -13 }
        );
        assert_eq!(
            repo.adjust_quantity(&main, 999, 1).await.unwrap(),
            QuantityChange::Missing
        );
        assert_eq!(repo.get(&main, bolt.id).await.unwrap().unwrap().quantity, -13);
    }

    #[tokio::test]
    async fn test_adjust_quantity_overflow_writes_nothing() {
        let (db, main) = setup().await;
        let repo = db.items();
        let bolt = repo
            .insert(&main, &NewItem::new("Bolt", i64::MAX - 1, ""))
            .await
            .unwrap();

        assert_eq!(
            repo.adjust_quantity(&main, bolt.id, 5).await.unwrap(),
            QuantityChange::Overflow
        );
        assert_eq!(
            repo.get(&main, bolt.id).await.unwrap().unwrap().quantity,
            i64::MAX - 1
        );
    }

    #[tokio::test]
    async fn test_update_onto_existing_id_is_unique_violation() {
        let (db, main) = setup().await;
        let repo = db.items();
        let bolt = repo.insert(&main, &NewItem::new("Bolt", 1, "")).await.unwrap();
        let nut = repo.insert(&main, &NewItem::new("Nut", 1, "")).await.unwrap();

        let moved = Item { id: nut.id, ..bolt.clone() };
        let err = repo.update(&main, bolt.id, &moved).await.unwrap_err();
        assert!(err.is_unique_violation());

        assert!(!repo.update(&main, 77, &moved).await.unwrap());
        assert_eq!(repo.get(&main, bolt.id).await.unwrap(), Some(bolt));
    }

    #[tokio::test]
    async fn test_delete_missing_item() {
        let (db, main) = setup().await;
        assert!(!db.items().delete(&main, 5).await.unwrap());
    }
}
