//! Service layer wrapping the database with identity settings.

use lode_core::providers::LoginProviders;
use tokio::sync::Mutex;

use crate::LodeDb;
use crate::error::DatabaseError;

/// Owns the database handle and the settings the identity rules need.
///
/// Repository methods are implemented as `impl LodeService` blocks in
/// [`crate::repos`] and [`crate::identities`].
pub struct LodeService {
    db: LodeDb,
    login_providers: LoginProviders,
    /// Held by every write and by identity reads. The disconnect
    /// transaction runs on the shared connection, so nothing else may touch
    /// it until that transaction ends.
    write_lock: Mutex<()>,
}

impl LodeService {
    /// Open a local database and wrap it.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `login_providers` - Provider types whose global identities support login.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(
        db_path: &str,
        login_providers: LoginProviders,
    ) -> Result<Self, DatabaseError> {
        let db = LodeDb::open_local(db_path).await?;
        Ok(Self::from_db(db, login_providers))
    }

    /// Create from an existing `LodeDb`.
    #[must_use]
    pub fn from_db(db: LodeDb, login_providers: LoginProviders) -> Self {
        Self {
            db,
            login_providers,
            write_lock: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &LodeDb {
        &self.db
    }

    #[must_use]
    pub const fn login_providers(&self) -> &LoginProviders {
        &self.login_providers
    }

    pub(crate) const fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}
