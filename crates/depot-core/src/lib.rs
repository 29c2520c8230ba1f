//! # depot-core: Pure Domain Logic for Depot
//!
//! This crate holds the types and rules shared by the database layer and the
//! inventory manager. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Depot Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web layer (out of this workspace)               │   │
//! │  │    form POST ──► manager operation ──► redirect ──► snapshot    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    depot-manager                                │   │
//! │  │    InventoryManager, Session, transient error / edit payload    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ depot-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌───────────────┐  ┌───────────────────┐  │   │
//! │  │   │     types     │  │  validation   │  │      error        │  │   │
//! │  │   │ WarehouseName │  │ parse_integer │  │ Rejection         │  │   │
//! │  │   │ Item Snapshot │  │ name rules    │  │ ValidationError   │  │   │
//! │  │   └───────────────┘  └───────────────┘  └───────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    depot-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (WarehouseName, Item, Snapshot)
//! - [`error`] - Rejections and validation errors
//! - [`validation`] - Form field parsing and name rules
//!
//! ## Example Usage
//!
//! ```rust
//! use depot_core::{validation::parse_integer, WarehouseName};
//!
//! let name = WarehouseName::parse("Back Room").unwrap();
//! assert_eq!(name.as_str(), "Back_Room");
//!
//! assert_eq!(parse_integer("Quantity", "-3").unwrap(), -3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{Rejection, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a normalized warehouse name, in characters.
pub const MAX_WAREHOUSE_NAME_LEN: usize = 64;
