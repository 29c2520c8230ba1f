//! Warehouse operations: create (optionally copying item types), select,
//! delete.

use depot_core::{Rejection, WarehouseName};
use depot_db::DbResult;
use tracing::{debug, info};

use super::{settle, InventoryManager};
use crate::error::{ManagerResult, Outcome};
use crate::session::Session;

impl InventoryManager {
    /// Creates a warehouse and selects it.
    ///
    /// Spaces in `name` become underscores. With `copy_items_from_current`
    /// and a selection, every item of the selected warehouse is copied with
    /// quantity 0 (same name, id and notes).
    ///
    /// ## Rejections
    /// - empty or over-long name
    /// - `"Warehouse Name must be unique"`
    pub async fn create_warehouse(
        &self,
        session: &mut Session,
        name: &str,
        copy_items_from_current: bool,
    ) -> ManagerResult<Outcome> {
        let result = self
            .try_create_warehouse(session, name, copy_items_from_current)
            .await;
        settle(session, "create_warehouse", result)
    }

    async fn try_create_warehouse(
        &self,
        session: &mut Session,
        name: &str,
        copy_items_from_current: bool,
    ) -> DbResult<Outcome> {
        let name = match WarehouseName::parse(name) {
            Ok(name) => name,
            Err(e) => return Ok(Rejection::from(e).into()),
        };

        if self.db.warehouses().exists(name.as_str()).await? {
            return Ok(Rejection::DuplicateWarehouse.into());
        }

        let source = if copy_items_from_current {
            session.current_warehouse().cloned()
        } else {
            None
        };

        match self.db.warehouses().create(&name, source.as_ref()).await {
            Ok(_) => {}
            // Lost a race with another session creating the same name.
            Err(e) if e.is_unique_violation() => return Ok(Rejection::DuplicateWarehouse.into()),
            Err(e) => return Err(e),
        }

        info!(warehouse = %name, copied_from = ?source.as_ref().map(|w| w.as_str()), "Created warehouse");
        session.select(name);
        Ok(Outcome::Applied)
    }

    /// Makes `name` the current warehouse.
    ///
    /// The name is looked up exactly as given. Selecting the current
    /// warehouse again is a no-op.
    ///
    /// ## Rejections
    /// - `"<name> is not a warehouse"`
    pub async fn select_warehouse(&self, session: &mut Session, name: &str) -> ManagerResult<Outcome> {
        let result = self.try_select_warehouse(session, name).await;
        settle(session, "select_warehouse", result)
    }

    async fn try_select_warehouse(&self, session: &mut Session, name: &str) -> DbResult<Outcome> {
        let Some(warehouse) = self.db.warehouses().get_by_name(name).await? else {
            return Ok(Rejection::UnknownWarehouse(name.to_string()).into());
        };

        if session.current_warehouse() == Some(&warehouse.name) {
            return Ok(Outcome::Unchanged);
        }

        debug!(warehouse = %warehouse.name, "Switching warehouse");
        session.select(warehouse.name);
        Ok(Outcome::Applied)
    }

    /// Deletes the selected warehouse with all its items and clears the
    /// selection. No-op without a selection.
    pub async fn delete_current_warehouse(&self, session: &mut Session) -> ManagerResult<Outcome> {
        let result = self.try_delete_current_warehouse(session).await;
        settle(session, "delete_current_warehouse", result)
    }

    async fn try_delete_current_warehouse(&self, session: &mut Session) -> DbResult<Outcome> {
        let Some(current) = session.current_warehouse().cloned() else {
            return Ok(Outcome::Unchanged);
        };

        let removed = self.db.warehouses().delete(&current).await?;
        session.clear_selection();

        if removed {
            info!(warehouse = %current, "Deleted warehouse");
        } else {
            debug!(warehouse = %current, "Selected warehouse was already gone");
        }

        Ok(Outcome::Applied)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
