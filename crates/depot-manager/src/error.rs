//! # Manager Error Types
//!
//! Two kinds of failure leave an operation:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    What an Operation Returns                            │
//! │                                                                         │
//! │  bad input / unknown id / duplicate name                               │
//! │       └──► Ok(Outcome::Rejected(Rejection))                            │
//! │              + session.pending_error = rejection message               │
//! │                                                                         │
//! │  SQLite failure (disk, lock, closed pool)                              │
//! │       └──► Err(ManagerError::Unavailable(DbError))                     │
//! │              + session.pending_error = "Inventory storage is           │
//! │                unavailable"                                            │
//! │                                                                         │
//! │  Neither case changes the store or the selection.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use depot_core::Rejection;
use depot_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Infrastructure failures. User mistakes are never errors; they are
/// [`Outcome::Rejected`].
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The backing store failed.
    #[error("Inventory storage is unavailable: {0}")]
    Unavailable(#[from] DbError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// What a mutating operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The store or the selection changed.
    Applied,

    /// Valid request with nothing to do (e.g. selecting the current warehouse).
    Unchanged,

    /// The request was refused; the message is also in `pending_error`.
    Rejected(Rejection),
}

impl Outcome {
    /// Returns true if the operation changed something.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// Returns the rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl From<Rejection> for Outcome {
    fn from(rejection: Rejection) -> Self {
        Outcome::Rejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_helpers() {
        assert!(Outcome::Applied.is_applied());
        assert!(!Outcome::Unchanged.is_applied());

        let outcome: Outcome = Rejection::DuplicateItemId.into();
        assert_eq!(outcome.rejection(), Some(&Rejection::DuplicateItemId));
        assert!(Outcome::Applied.rejection().is_none());
    }

    #[test]
    fn test_unavailable_wraps_db_error() {
        let err = ManagerError::from(DbError::PoolExhausted);
        assert!(matches!(err, ManagerError::Unavailable(DbError::PoolExhausted)));
        assert_eq!(
            err.to_string(),
            "Inventory storage is unavailable: Connection pool exhausted"
        );
    }
}
