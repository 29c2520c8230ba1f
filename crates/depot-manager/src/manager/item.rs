//! Item operations on the selected warehouse.
//!
//! All numeric form fields go through [`parse_integer`], which trims
//! surrounding whitespace. Text fields are stored verbatim.
//!
//! ```text
//! operation        parse failure                        missing target
//! ─────────        ─────────────                        ──────────────
//! add_item         'Quantity' must be an integer        (no selection) Add or select ...
//!                                                       (ids used up) No item IDs are left ...
//! adjust_quantity  'Quantity' and ID must be an integers.   Item ID does not exist!
//! request_edit     (treated as missing)                 Item ID does not exist
//! apply_edit       'Quantity' must be an integer.       Item ID does not exist
//!                  IDs must be integers.
//! delete_item      silent                               silent
//! ```

use depot_core::validation::parse_integer;
use depot_core::{Item, NewItem, Rejection};
use depot_db::{DbError, DbResult, QuantityChange};
use tracing::{debug, warn};

use super::{settle, InventoryManager};
use crate::error::{ManagerResult, Outcome};
use crate::session::Session;

impl InventoryManager {
    /// Adds an item to the selected warehouse with the next free id.
    pub async fn add_item(
        &self,
        session: &mut Session,
        name: &str,
        quantity: &str,
        other: &str,
    ) -> ManagerResult<Outcome> {
        let result = self.try_add_item(session, name, quantity, other).await;
        settle(session, "add_item", result)
    }

    async fn try_add_item(
        &self,
        session: &mut Session,
        name: &str,
        quantity: &str,
        other: &str,
    ) -> DbResult<Outcome> {
        let Some(current) = session.current_warehouse() else {
            return Ok(Rejection::NoWarehouseSelected.into());
        };
        let Ok(quantity) = parse_integer("Quantity", quantity) else {
            return Ok(Rejection::QuantityNotInteger.into());
        };

        match self
            .db
            .items()
            .insert(current, &NewItem::new(name, quantity, other))
            .await
        {
            Ok(item) => {
                debug!(warehouse = %current, id = item.id, "Added item");
                Ok(Outcome::Applied)
            }
            Err(DbError::IdsExhausted { .. }) => Ok(Rejection::ItemIdsExhausted.into()),
            // Deleted through another session since it was selected.
            Err(e) if e.is_not_found() => {
                if let Some(gone) = session.clear_selection() {
                    warn!(warehouse = %gone, "Selected warehouse no longer exists");
                }
                Ok(Rejection::NoWarehouseSelected.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Adds `delta` to the quantity of item `id`. Results may be negative.
    pub async fn adjust_quantity(
        &self,
        session: &mut Session,
        id: &str,
        delta: &str,
    ) -> ManagerResult<Outcome> {
        let result = self.try_adjust_quantity(session, id, delta).await;
        settle(session, "adjust_quantity", result)
    }

    async fn try_adjust_quantity(&self, session: &Session, id: &str, delta: &str) -> DbResult<Outcome> {
        let (Ok(id), Ok(delta)) = (parse_integer("ID", id), parse_integer("Quantity", delta)) else {
            return Ok(Rejection::AdjustmentNotInteger.into());
        };
        let Some(current) = session.current_warehouse() else {
            return Ok(Rejection::AdjustTargetMissing.into());
        };

        match self.db.items().adjust_quantity(current, id, delta).await? {
            QuantityChange::Adjusted { quantity } => {
                debug!(warehouse = %current, id, delta, quantity, "Adjusted quantity");
                Ok(Outcome::Applied)
            }
            QuantityChange::Missing => Ok(Rejection::AdjustTargetMissing.into()),
            QuantityChange::Overflow => Ok(Rejection::AdjustmentNotInteger.into()),
        }
    }

    /// Stages item `id` as the edit payload of the next snapshot.
    pub async fn request_edit(&self, session: &mut Session, id: &str) -> ManagerResult<Outcome> {
        let result = self.try_request_edit(session, id).await;
        settle(session, "request_edit", result)
    }

    async fn try_request_edit(&self, session: &mut Session, id: &str) -> DbResult<Outcome> {
        let (Some(current), Ok(id)) = (session.current_warehouse(), parse_integer("ID", id)) else {
            return Ok(Rejection::ItemNotFound.into());
        };

        let Some(item) = self.db.items().get(current, id).await? else {
            return Ok(Rejection::ItemNotFound.into());
        };

        debug!(warehouse = %current, id, "Staged item for editing");
        session.stage_edit(item);
        Ok(Outcome::Applied)
    }

    /// Overwrites the item at `old_id` with the submitted fields, which may
    /// include a new id.
    pub async fn apply_edit(
        &self,
        session: &mut Session,
        name: &str,
        id: &str,
        quantity: &str,
        other: &str,
        old_id: &str,
    ) -> ManagerResult<Outcome> {
        let result = self
            .try_apply_edit(session, name, id, quantity, other, old_id)
            .await;
        settle(session, "apply_edit", result)
    }

    async fn try_apply_edit(
        &self,
        session: &Session,
        name: &str,
        id: &str,
        quantity: &str,
        other: &str,
        old_id: &str,
    ) -> DbResult<Outcome> {
        let Ok(quantity) = parse_integer("Quantity", quantity) else {
            return Ok(Rejection::EditQuantityNotInteger.into());
        };
        let (Ok(id), Ok(old_id)) = (parse_integer("ID", id), parse_integer("ID", old_id)) else {
            return Ok(Rejection::EditIdsNotIntegers.into());
        };
        let Some(current) = session.current_warehouse() else {
            return Ok(Rejection::ItemNotFound.into());
        };

        let items = self.db.items();
        if id != old_id && items.exists(current, id).await? {
            return Ok(Rejection::DuplicateItemId.into());
        }

        let edited = Item {
            name: name.to_string(),
            id,
            quantity,
            other: other.to_string(),
        };

        match items.update(current, old_id, &edited).await {
            Ok(true) => {
                debug!(warehouse = %current, old_id, id, "Saved item edit");
                Ok(Outcome::Applied)
            }
            Ok(false) => Ok(Rejection::ItemNotFound.into()),
            // Another session took the id between the check and the update.
            Err(e) if e.is_unique_violation() => Ok(Rejection::DuplicateItemId.into()),
            Err(e) => Err(e),
        }
    }

    /// Removes item `id` from the selected warehouse.
    ///
    /// A missing or non-integer id, or no selection, is a silent no-op.
    pub async fn delete_item(&self, session: &mut Session, id: &str) -> ManagerResult<Outcome> {
        let result = self.try_delete_item(session, id).await;
        settle(session, "delete_item", result)
    }

    async fn try_delete_item(&self, session: &Session, id: &str) -> DbResult<Outcome> {
        let Some(current) = session.current_warehouse() else {
            debug!("Delete ignored: no warehouse selected");
            return Ok(Outcome::Unchanged);
        };
        let Ok(id) = parse_integer("ID", id) else {
            debug!(id, "Delete ignored: id is not an integer");
            return Ok(Outcome::Unchanged);
        };

        if self.db.items().delete(current, id).await? {
            debug!(warehouse = %current, id, "Deleted item");
            Ok(Outcome::Applied)
        } else {
            debug!(warehouse = %current, id, "Delete ignored: no such item");
            Ok(Outcome::Unchanged)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
