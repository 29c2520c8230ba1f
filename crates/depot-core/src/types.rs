//! # Domain Types
//!
//! Core domain types used throughout Depot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ WarehouseName   │   │   Warehouse     │   │      Item       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  "North_Dock"   │   │  id (catalog)   │   │  name           │       │
//! │  │  (no spaces,    │   │  name           │   │  id (per whse)  │       │
//! │  │   non-empty)    │   │  created_at     │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   │  other          │       │
//! │                                               └─────────────────┘       │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │  Snapshot (what the page renders after every request)         │     │
//! │  │  current_warehouse, known_warehouses, items,                  │     │
//! │  │  pending_edit_payload, pending_error                          │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - Warehouses are identified by their normalized name; the catalog row id
//!   is internal to the database layer.
//! - Items are identified by `id`, unique only within their warehouse.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{normalize_warehouse_name, ValidationResult};

// =============================================================================
// Warehouse Name
// =============================================================================

/// A validated, normalized warehouse name.
///
/// Spaces are replaced with underscores on construction, so two submissions
/// that differ only by spaces vs. underscores name the same warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WarehouseName(String);

impl WarehouseName {
    /// Normalizes and validates a raw name.
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::WarehouseName;
    ///
    /// let name = WarehouseName::parse("North Dock").unwrap();
    /// assert_eq!(name.as_str(), "North_Dock");
    /// ```
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        normalize_warehouse_name(raw).map(WarehouseName)
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for WarehouseName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WarehouseName::parse(&value)
    }
}

impl From<WarehouseName> for String {
    fn from(name: WarehouseName) -> Self {
        name.0
    }
}

impl AsRef<str> for WarehouseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for WarehouseName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WarehouseName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for WarehouseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Warehouse
// =============================================================================

/// A catalog entry for one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// Catalog row id. Increases with creation order.
    pub id: i64,

    /// Normalized, unique name.
    pub name: WarehouseName,

    /// When the warehouse was created (or imported).
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Item
// =============================================================================

/// An inventory record inside one warehouse.
///
/// Also used as the edit payload staged by `request_edit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    /// Display name.
    pub name: String,

    /// Identifier, unique within the warehouse.
    pub id: i64,

    /// Stock on hand. No lower bound; may be negative.
    pub quantity: i64,

    /// Free-text notes.
    pub other: String,
}

/// An item about to be inserted; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
    pub other: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>, quantity: i64, other: impl Into<String>) -> Self {
        NewItem {
            name: name.into(),
            quantity,
            other: other.into(),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the view needs after a request.
///
/// Produced by `InventoryManager::get_snapshot`, which also clears the
/// session's transient fields. Renderers must fetch a fresh snapshot after
/// every mutating call and never cache one across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Snapshot {
    /// The selected warehouse, if any.
    #[ts(as = "Option<String>")]
    pub current_warehouse: Option<WarehouseName>,

    /// All warehouses in creation order.
    #[ts(as = "Vec<String>")]
    pub known_warehouses: Vec<WarehouseName>,

    /// Items of the selected warehouse; `None` when nothing is selected.
    pub items: Option<Vec<Item>>,

    /// The item staged by `request_edit`, consumed by this snapshot.
    pub pending_edit_payload: Option<Item>,

    /// The message from the last rejected operation, consumed by this snapshot.
    pub pending_error: Option<String>,
}

impl Snapshot {
    /// Looks up an item of the selected warehouse by id.
    pub fn item(&self, id: i64) -> Option<&Item> {
        self.items.as_ref()?.iter().find(|item| item.id == id)
    }

    /// Returns a copy with both transient fields cleared.
    ///
    /// Useful for comparing the persistent part of two snapshots.
    pub fn persistent_view(&self) -> Snapshot {
        Snapshot {
            pending_edit_payload: None,
            pending_error: None,
            ..self.clone()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt() -> Item {
        Item {
            name: "Bolt".to_string(),
            id: 1,
            quantity: 10,
            other: "steel".to_string(),
        }
    }

    #[test]
    fn test_warehouse_name_normalizes_spaces() {
        let name = WarehouseName::parse("East Annex").unwrap();
        assert_eq!(name, "East_Annex");
        assert_eq!(name.to_string(), "East_Annex");
        assert_eq!(WarehouseName::parse("East_Annex").unwrap(), name);
    }

    #[test]
    fn test_warehouse_name_serde_roundtrip_validates() {
        let name: WarehouseName = serde_json::from_str("\"Main Floor\"").unwrap();
        assert_eq!(name.as_str(), "Main_Floor");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Main_Floor\"");
        assert!(serde_json::from_str::<WarehouseName>("\"\"").is_err());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot = Snapshot {
            current_warehouse: Some(WarehouseName::parse("Main").unwrap()),
            known_warehouses: vec![WarehouseName::parse("Main").unwrap()],
            items: Some(vec![bolt()]),
            pending_edit_payload: None,
            pending_error: Some("IDs must be unique.".to_string()),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["currentWarehouse"], "Main");
        assert_eq!(json["knownWarehouses"][0], "Main");
        assert_eq!(json["items"][0]["quantity"], 10);
        assert!(json["pendingEditPayload"].is_null());
        assert_eq!(json["pendingError"], "IDs must be unique.");
    }

    #[test]
    fn test_snapshot_helpers() {
        let snapshot = Snapshot {
            current_warehouse: None,
            known_warehouses: Vec::new(),
            items: Some(vec![bolt()]),
            pending_edit_payload: Some(bolt()),
            pending_error: Some("x".to_string()),
        };

        assert_eq!(snapshot.item(1).map(|i| i.quantity), Some(10));
        assert!(snapshot.item(2).is_none());

        let view = snapshot.persistent_view();
        assert!(view.pending_error.is_none());
        assert!(view.pending_edit_payload.is_none());
        assert_eq!(view.items, snapshot.items);
    }
}
