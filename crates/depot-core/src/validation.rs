//! # Validation Module
//!
//! Input validation utilities for Depot.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form (HTML)                                              │
//! │  └── Every field arrives as a string, numeric or not                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: InventoryManager                                             │
//! │  ├── THIS MODULE: integer parsing, warehouse name rules                │
//! │  └── Existence / uniqueness checks against the store                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (warehouses.name)                                          │
//! │  └── PRIMARY KEY (items.warehouse_id, items.id)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use depot_core::validation::parse_integer;
//!
//! assert_eq!(parse_integer("Quantity", " 12 ").unwrap(), 12);
//! assert!(parse_integer("Quantity", "twelve").is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_WAREHOUSE_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Fields
// =============================================================================

/// Parses a submitted form field as a signed 64-bit integer.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - An optional leading `+` or `-` is accepted
/// - Anything else (decimals, words, empty, out of i64 range) fails
///
/// ## Example
/// ```rust
/// use depot_core::validation::parse_integer;
///
/// assert_eq!(parse_integer("ID", "-3").unwrap(), -3);
/// assert!(parse_integer("ID", "1.5").is_err());
/// assert!(parse_integer("ID", "").is_err());
/// ```
pub fn parse_integer(field: &str, raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

// =============================================================================
// Warehouse Names
// =============================================================================

/// Normalizes and validates a submitted warehouse name.
///
/// ## Rules
/// - Every space is replaced with `_` (so "North Dock" becomes "North_Dock")
/// - Must not be empty
/// - Must be at most [`MAX_WAREHOUSE_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use depot_core::validation::normalize_warehouse_name;
///
/// assert_eq!(normalize_warehouse_name("North Dock").unwrap(), "North_Dock");
/// assert!(normalize_warehouse_name("").is_err());
/// ```
pub fn normalize_warehouse_name(raw: &str) -> ValidationResult<String> {
    let name = raw.replace(' ', "_");

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "Warehouse Name".to_string(),
        });
    }

    if name.chars().count() > MAX_WAREHOUSE_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "Warehouse Name".to_string(),
            max: MAX_WAREHOUSE_NAME_LEN,
        });
    }

    Ok(name)
}

// =============================================================================
// Unit Tests
// =============================================================================
