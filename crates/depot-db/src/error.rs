//! # Database Error Types
//!
//! ```text
//! sqlx::Error / MigrateError
//!       │  From impls below
//!       ▼
//! DbError ──► repositories return DbResult<T>
//!       │
//!       ├── UniqueViolation ──► manager turns it into a duplicate-name or
//!       │                       duplicate-id message
//!       ├── NotFound ─────────► (add_item) the warehouse vanished
//!       ├── IdsExhausted ─────► (add_item) no id above the highest one
//!       └── everything else ──► ManagerError::Unavailable
//! ```

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Failures of the SQLite store.
#[derive(Debug, Error)]
pub enum DbError {
    /// A row the operation depends on is missing, e.g. inserting an item
    /// into a warehouse that is not in the catalog.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE or PRIMARY KEY constraint rejected the write.
    /// `field` is the constraint target as SQLite reports it
    /// (`warehouses.name`, `items.warehouse_id, items.id`).
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The warehouse already used `i64::MAX` as an item id, so no new id
    /// can be assigned.
    #[error("Item ids exhausted in {warehouse}")]
    IdsExhausted { warehouse: String },

    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database could not be opened, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN or COMMIT failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

const UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message();

                let unique = matches!(db_err.kind(), ErrorKind::UniqueViolation)
                    || message.starts_with(UNIQUE_PREFIX);
                let foreign_key = matches!(db_err.kind(), ErrorKind::ForeignKeyViolation)
                    || message.contains("FOREIGN KEY constraint failed");

                if unique {
                    let field = message
                        .strip_prefix(UNIQUE_PREFIX)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::duplicate(field, "unknown")
                } else if foreign_key {
                    DbError::ForeignKeyViolation {
                        message: message.to_string(),
                    }
                } else {
                    DbError::QueryFailed(message.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DbError::not_found("Warehouse", "North");
        assert_eq!(err.to_string(), "Warehouse not found: North");

        let err = DbError::duplicate("warehouses.name", "North");
        assert_eq!(
            err.to_string(),
            "Duplicate warehouses.name: 'North' already exists"
        );
        assert!(err.is_unique_violation());
        assert!(!DbError::PoolExhausted.is_unique_violation());

        let err = DbError::IdsExhausted {
            warehouse: "Main".to_string(),
        };
        assert_eq!(err.to_string(), "Item ids exhausted in Main");
        assert!(DbError::not_found("Warehouse", "Main").is_not_found());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_constraint_errors_map() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let insert = "INSERT INTO warehouses (name, last_item_id, created_at) VALUES ('Main', 0, '')";

        sqlx::query(insert).execute(db.pool()).await.unwrap();
        let err = DbError::from(sqlx::query(insert).execute(db.pool()).await.unwrap_err());
        match err {
            DbError::UniqueViolation { field, .. } => assert_eq!(field, "warehouses.name"),
            other => panic!("expected unique violation, got {other:?}"),
        }

        let orphan = sqlx::query("INSERT INTO items (warehouse_id, id, name, quantity) VALUES (99, 1, 'Bolt', 0)")
            .execute(db.pool())
            .await
            .unwrap_err();
        assert!(matches!(
            DbError::from(orphan),
            DbError::ForeignKeyViolation { .. }
        ));
    }
}
