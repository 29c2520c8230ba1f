//! # Error Types
//!
//! Domain-specific error types for depot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  depot-core errors (this file)                                         │
//! │  ├── ValidationError  - A single field failed its rules                │
//! │  └── Rejection        - What the user is told (pending_error text)     │
//! │                                                                         │
//! │  depot-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  depot-manager errors                                                  │
//! │  └── ManagerError     - Infrastructure failures (storage unavailable)  │
//! │                                                                         │
//! │  Flow: ValidationError → Rejection → Session.pending_error → Snapshot  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `Rejection`'s `Display` output is exactly the text the page shows, so
//! the message strings below are part of the external contract.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These describe which field failed and why. They are folded into a
/// [`Rejection`] before reaching the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field could not be parsed as a whole number.
    #[error("{field} must be an integer, got '{value}'")]
    NotAnInteger { field: String, value: String },
}

// =============================================================================
// Rejection
// =============================================================================

/// A user-facing reason an operation was refused.
///
/// A rejected operation changes nothing in the store or in the session's
/// selection; only `pending_error` is set to `rejection.to_string()`.
///
/// ## Message Table
/// ```text
/// DuplicateWarehouse       "Warehouse Name must be unique"
/// UnknownWarehouse(n)      "<n> is not a warehouse"
/// InvalidWarehouseName(e)  "Warehouse Name is required" / "... at most 64 ..."
/// NoWarehouseSelected      "Add or select a warehouse to add an item"
/// QuantityNotInteger       "'Quantity' must be an integer"
/// AdjustmentNotInteger     "'Quantity' and ID must be an integers."
/// AdjustTargetMissing      "Item ID does not exist!"
/// ItemNotFound             "Item ID does not exist"
/// EditQuantityNotInteger   "'Quantity' must be an integer."
/// EditIdsNotIntegers       "IDs must be integers."
/// DuplicateItemId          "IDs must be unique."
/// ItemIdsExhausted         "No item IDs are left in this warehouse"
/// StorageUnavailable       "Inventory storage is unavailable"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// A warehouse with the normalized name already exists.
    #[error("Warehouse Name must be unique")]
    DuplicateWarehouse,

    /// `select_warehouse` was given a name that is not in the catalog.
    #[error("{0} is not a warehouse")]
    UnknownWarehouse(String),

    /// The submitted warehouse name is empty or too long.
    #[error("{0}")]
    InvalidWarehouseName(ValidationError),

    /// An item was added while no warehouse is selected.
    #[error("Add or select a warehouse to add an item")]
    NoWarehouseSelected,

    /// `add_item` quantity is not an integer.
    #[error("'Quantity' must be an integer")]
    QuantityNotInteger,

    /// `adjust_quantity` id or delta is not an integer (or overflows).
    #[error("'Quantity' and ID must be an integers.")]
    AdjustmentNotInteger,

    /// `adjust_quantity` targeted an id that is not in the current warehouse.
    #[error("Item ID does not exist!")]
    AdjustTargetMissing,

    /// `request_edit` / `apply_edit` targeted an id that is not present.
    #[error("Item ID does not exist")]
    ItemNotFound,

    /// `apply_edit` quantity is not an integer.
    #[error("'Quantity' must be an integer.")]
    EditQuantityNotInteger,

    /// `apply_edit` id or old id is not an integer.
    #[error("IDs must be integers.")]
    EditIdsNotIntegers,

    /// `apply_edit` would move an item onto an id another item already owns.
    #[error("IDs must be unique.")]
    DuplicateItemId,

    /// `add_item` found an item already holding the largest possible id.
    #[error("No item IDs are left in this warehouse")]
    ItemIdsExhausted,

    /// The backing store failed; shown when an operation hit an
    /// infrastructure error rather than bad input.
    #[error("Inventory storage is unavailable")]
    StorageUnavailable,
}

impl Rejection {
    /// Returns the message placed into `pending_error`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ValidationError> for Rejection {
    fn from(err: ValidationError) -> Self {
        Rejection::InvalidWarehouseName(err)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
