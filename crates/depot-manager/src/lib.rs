//! # depot-manager: Stateful Inventory Manager
//!
//! The component a web front end drives: it parses form fields, enforces the
//! inventory rules, stores items through `depot-db`, and assembles the
//! [`Snapshot`](depot_core::Snapshot) the page renders.
//!
//! ## Module Organization
//! ```text
//! depot_manager/
//! ├── lib.rs          ◄─── You are here
//! ├── manager/
//! │   ├── mod.rs      ◄─── InventoryManager: open, snapshot, lookups
//! │   ├── warehouse.rs◄─── create / select / delete warehouse
//! │   └── item.rs     ◄─── add / adjust / edit / delete item
//! ├── session.rs      ◄─── Session, OneShot
//! ├── config.rs       ◄─── ManagerConfig from environment
//! ├── error.rs        ◄─── ManagerError, Outcome
//! └── telemetry.rs    ◄─── tracing subscriber
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depot_manager::{InventoryManager, ManagerConfig, Session};
//!
//! let manager = InventoryManager::open(&ManagerConfig::load()?).await?;
//! let mut session = Session::new();
//!
//! manager.create_warehouse(&mut session, "North Dock", false).await?;
//! manager.add_item(&mut session, "Bolt", "10", "M8 steel").await?;
//!
//! let snapshot = manager.get_snapshot(&mut session).await?;
//! assert_eq!(snapshot.current_warehouse.unwrap(), "North_Dock");
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod session;
pub mod telemetry;

pub use config::{ConfigError, ManagerConfig};
pub use error::{ManagerError, ManagerResult, Outcome};
pub use manager::InventoryManager;
pub use session::{OneShot, Session, Transient};
