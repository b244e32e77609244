//! Database and identity-service error types for lode-db.

use lode_core::{DisconnectStatus, IdentityCategory};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

/// Errors from identity lookups and disconnects.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No user has this id.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// No identity with this category and id belongs to the user (or the user
    /// does not exist).
    #[error("Identity not found: {category} {id}")]
    NotFound { category: IdentityCategory, id: i64 },

    /// The identity is the user's last way to log in.
    #[error("Identity {category} {id} cannot be disconnected: {status}")]
    NotDisconnectable {
        category: IdentityCategory,
        id: i64,
        status: DisconnectStatus,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<libsql::Error> for IdentityError {
    fn from(e: libsql::Error) -> Self {
        Self::Database(e.into())
    }
}
