//! # lode-db
//!
//! libSQL storage for Lodestar users and identities, plus the identity
//! service that decorates them with disconnect statuses.
//!
//! Uses the `libsql` crate with a local database file (or `:memory:` in
//! tests). Every repository method lives on [`LodeService`].

pub mod error;
pub mod helpers;
pub mod identities;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

pub use error::{DatabaseError, IdentityError};
pub use service::LodeService;

use libsql::{Builder, TransactionBehavior};

/// Central database handle.
///
/// Wraps a libSQL database and one shared connection.
pub struct LodeDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LodeDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let lode_db = Self { db, conn };
        lode_db.run_migrations().await?;
        Ok(lode_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Begin a transaction that takes the database write lock up front.
    ///
    /// The returned transaction derefs to a `Connection`, so repository
    /// functions can run inside it unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if `BEGIN IMMEDIATE` fails (e.g. the database
    /// is locked by another process).
    pub async fn begin_immediate(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?)
    }
}
