//! # Repository Module
//!
//! Database repository implementations for Depot.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  InventoryManager::add_item                                            │
//! │       │                                                                 │
//! │       │  db.items().insert(&warehouse, &new_item)                      │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── list(&self, warehouse)                                            │
//! │  ├── exists(&self, warehouse, id)                                      │
//! │  ├── insert(&self, warehouse, item)                                    │
//! │  └── adjust_quantity(&self, warehouse, id, delta)                      │
//! │       │                                                                 │
//! │       │  Parameterized SQL (values are always bound, never formatted)  │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`WarehouseRepository`](warehouse::WarehouseRepository) - Catalog CRUD and copy-create
//! - [`ItemRepository`](item::ItemRepository) - Item CRUD scoped to one warehouse
//! - [`LegacyImporter`](legacy::LegacyImporter) - Table-per-warehouse import

pub mod item;
pub mod legacy;
pub mod warehouse;
