//! # Store Connection
//!
//! Opening the SQLite store and handing out repositories.
//!
//! ## Opening Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database::new(config)                              │
//! │                                                                         │
//! │  StoreLocation::File(path)             StoreLocation::Memory           │
//! │   ├── create file if missing            ├── one private database       │
//! │   ├── journal_mode = WAL                │   per pool                   │
//! │   └── synchronous  = NORMAL             └── single connection that     │
//! │                                             never expires              │
//! │              │                                   │                      │
//! │              └──────────────┬────────────────────┘                      │
//! │                             ▼                                           │
//! │              foreign_keys = ON  (items cascade with their warehouse)   │
//! │                             │                                           │
//! │                             ▼                                           │
//! │   SqlitePool ──► set aside legacy "items"/"warehouses" tables          │
//! │              ──► embedded migrations (unless disabled)                 │
//! │                             │                                           │
//! │                             ▼                                           │
//! │        warehouses() / items() / legacy() share the pool                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::item::ItemRepository;
use crate::repository::legacy::LegacyImporter;
use crate::repository::warehouse::WarehouseRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the inventory lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file, created on first open.
    File(PathBuf),
    /// A throwaway database that disappears with its pool.
    Memory,
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// Connection settings for the store.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./default_database")
///     .max_connections(8)
///     .idle_timeout(None);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: StoreLocation,

    /// Upper bound on pooled connections. Default: 5
    pub max_connections: u32,

    /// Connections opened eagerly and kept. Default: 1
    pub min_connections: u32,

    /// How long an operation waits for a free connection. Default: 30 s
    pub acquire_timeout: Duration,

    /// Idle connections older than this are closed. Default: 10 min
    pub idle_timeout: Option<Duration>,

    /// Apply embedded migrations when connecting. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Settings for a database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: StoreLocation::File(path.into()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Settings for a private in-memory database (tests, demos).
    ///
    /// Each in-memory connection is its own database, so the pool is pinned
    /// to one connection that is never reaped.
    pub fn in_memory() -> Self {
        DbConfig {
            location: StoreLocation::Memory,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == StoreLocation::Memory
    }

    /// The database file, if this is a file-backed store.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            StoreLocation::File(path) => Some(path.as_path()),
            StoreLocation::Memory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            StoreLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            StoreLocation::Memory => SqliteConnectOptions::new().in_memory(true),
        };

        // Off by default in SQLite; the items table relies on ON DELETE CASCADE.
        options.foreign_keys(true)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout);

        match self.location {
            StoreLocation::Memory => options.max_lifetime(None),
            StoreLocation::File(_) => options,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the inventory store.
///
/// Clones share one pool, so any number of sessions can hold a `Database`.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects to the store and, unless disabled, brings its schema up to
    /// date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = %config.location, "Opening inventory store");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(format!("{}: {}", config.location, e)))?;

        debug!(
            max_connections = config.max_connections,
            in_memory = config.is_in_memory(),
            "Connection pool ready"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending embedded migrations. Safe to repeat.
    ///
    /// Legacy warehouse tables named like a schema table are renamed first,
    /// so the schema is created beside them rather than skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        self.legacy().set_aside_colliding_tables().await?;
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Warehouse catalog operations.
    pub fn warehouses(&self) -> WarehouseRepository {
        WarehouseRepository::new(self.pool.clone())
    }

    /// Item operations, scoped per warehouse.
    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    /// Import of table-per-warehouse files.
    pub fn legacy(&self) -> LegacyImporter {
        LegacyImporter::new(self.pool.clone())
    }

    /// Closes every connection. Later operations fail with
    /// `DbError::ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing inventory store");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
