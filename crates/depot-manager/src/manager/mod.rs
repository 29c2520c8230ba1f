//! # Inventory Manager
//!
//! The stateful front of the inventory: every request handler calls one
//! operation with the caller's [`Session`], then renders [`get_snapshot`].
//!
//! [`get_snapshot`]: InventoryManager::get_snapshot
//!
//! ## Request Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Request, End to End                              │
//! │                                                                         │
//! │  form fields (&str)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  operation(session, ...)                                               │
//! │   ├── parse / validate ──── bad ───► Outcome::Rejected + pending_error │
//! │   ├── check the store ───── no  ───► Outcome::Rejected + pending_error │
//! │   ├── mutate (one tx) ──── fail ───► Err(Unavailable)  + pending_error │
//! │   └── update selection ────────────► Outcome::Applied                  │
//! │                                                                         │
//! │  get_snapshot(session)                                                 │
//! │   ├── catalog names, items of the selection                            │
//! │   └── take pending_error + pending_edit (one-shot)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Area       | Operations                                                   |
//! |------------|--------------------------------------------------------------|
//! | lifecycle  | `open`, `get_snapshot`, `list_warehouses`, `item_exists`     |
//! | warehouses | `create_warehouse`, `select_warehouse`, `delete_current_warehouse` |
//! | items      | `add_item`, `adjust_quantity`, `request_edit`, `apply_edit`, `delete_item` |

mod item;
mod warehouse;

use depot_core::{Rejection, Snapshot, Warehouse};
use depot_db::{Database, DbError, DbResult};
use tracing::{error, info, warn};

use crate::config::ManagerConfig;
use crate::error::{ManagerError, ManagerResult, Outcome};
use crate::session::Session;

/// Mediates between request handlers and the store.
///
/// Holds no per-caller state; clone it freely and give every caller its own
/// [`Session`].
#[derive(Debug, Clone)]
pub struct InventoryManager {
    db: Database,
}

impl InventoryManager {
    /// Opens (or creates) the store described by `config`.
    ///
    /// ## What This Does
    /// 1. Connects and runs embedded migrations
    /// 2. Imports table-per-warehouse data, if enabled
    /// 3. Logs the warehouses found in the catalog
    pub async fn open(config: &ManagerConfig) -> ManagerResult<Self> {
        info!(path = %config.database_path.display(), "Opening inventory");

        let db = Database::new(config.db_config()).await?;

        if config.import_legacy_tables {
            let imported = db.legacy().import_all().await?;
            if !imported.is_empty() {
                info!(count = imported.len(), "Imported legacy warehouses");
            }
        }

        let manager = InventoryManager::with_database(db);
        let warehouses = manager.db.warehouses().count().await?;
        info!(warehouses, "Inventory ready");

        Ok(manager)
    }

    /// Opens the store configured by the `DEPOT_*` environment variables.
    pub async fn open_from_env() -> ManagerResult<Self> {
        let config = ManagerConfig::load()?;
        InventoryManager::open(&config).await
    }

    /// Opens the store at `path` with default settings.
    pub async fn open_path(path: impl Into<std::path::PathBuf>) -> ManagerResult<Self> {
        let config = ManagerConfig {
            database_path: path.into(),
            ..ManagerConfig::default()
        };
        InventoryManager::open(&config).await
    }

    /// Wraps an already connected database.
    pub fn with_database(db: Database) -> Self {
        InventoryManager { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Everything the page renders, consuming the session's one-shot fields.
    ///
    /// A selection whose warehouse has left the catalog (deleted through
    /// another session) is cleared. If the store cannot be read, nothing is
    /// consumed and the error is returned.
    pub async fn get_snapshot(&self, session: &mut Session) -> ManagerResult<Snapshot> {
        let known_warehouses = self.db.warehouses().names().await.map_err(|e| {
            error!(error = %e, "Failed to read warehouse catalog");
            ManagerError::Unavailable(e)
        })?;

        let stale = session
            .current_warehouse()
            .is_some_and(|current| !known_warehouses.contains(current));
        if stale {
            if let Some(gone) = session.clear_selection() {
                warn!(warehouse = %gone, "Selected warehouse no longer exists");
            }
        }

        let items = match session.current_warehouse() {
            Some(current) => Some(self.db.items().list(current).await.map_err(|e| {
                error!(error = %e, warehouse = %current, "Failed to list items");
                ManagerError::Unavailable(e)
            })?),
            None => None,
        };

        let transient = session.take_transient();

        Ok(Snapshot {
            current_warehouse: session.current_warehouse().cloned(),
            known_warehouses,
            items,
            pending_edit_payload: transient.pending_edit_payload,
            pending_error: transient.pending_error,
        })
    }

    /// The warehouse catalog in creation order.
    pub async fn list_warehouses(&self) -> ManagerResult<Vec<Warehouse>> {
        Ok(self.db.warehouses().list().await?)
    }

    /// True iff the selected warehouse holds an item with this id.
    ///
    /// Always asks the store. False when nothing is selected.
    pub async fn item_exists(&self, session: &Session, id: i64) -> ManagerResult<bool> {
        match session.current_warehouse() {
            Some(current) => Ok(self.db.items().exists(current, id).await?),
            None => Ok(false),
        }
    }
}

/// Records the result of an operation in the session.
///
/// Rejections land in `pending_error` with their own message; store failures
/// with the generic storage message.
fn settle(
    session: &mut Session,
    operation: &'static str,
    result: DbResult<Outcome>,
) -> ManagerResult<Outcome> {
    match result {
        Ok(Outcome::Rejected(rejection)) => {
            warn!(operation, reason = %rejection, "Operation rejected");
            session.record_error(rejection.message());
            Ok(Outcome::Rejected(rejection))
        }
        Ok(outcome) => Ok(outcome),
        Err(err) => Err(store_failure(session, operation, err)),
    }
}

fn store_failure(session: &mut Session, operation: &'static str, err: DbError) -> ManagerError {
    error!(operation, error = %err, "Inventory store failed");
    session.record_error(Rejection::StorageUnavailable.message());
    ManagerError::Unavailable(err)
}

// =============================================================================
// Unit Tests
// =============================================================================
