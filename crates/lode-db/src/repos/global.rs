//! Identity provider and global identity repository.

use chrono::Utc;
use lode_core::entities::{GlobalIdentity, IdentityProvider};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::LodeService;

const GLOBAL_SELECT: &str = "SELECT i.id, i.user_id, p.type, p.external_id, i.external_id, i.date_added, i.date_verified
     FROM identities i JOIN identity_providers p ON p.id = i.idp_id";

fn row_to_global(row: &libsql::Row) -> Result<GlobalIdentity, DatabaseError> {
    Ok(GlobalIdentity {
        id: row.get::<i64>(0)?,
        user_id: row.get::<i64>(1)?,
        provider_type: row.get::<String>(2)?,
        provider_external_id: row.get::<String>(3)?,
        external_id: row.get::<String>(4)?,
        date_added: parse_datetime(&row.get::<String>(5)?)?,
        date_verified: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// All global identities of `user_id`, oldest first.
pub(crate) async fn select_global_identities(
    conn: &libsql::Connection,
    user_id: i64,
) -> Result<Vec<GlobalIdentity>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("{GLOBAL_SELECT} WHERE i.user_id = ?1 ORDER BY i.id"),
            [user_id],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_global(&row)?);
    }
    Ok(results)
}

/// Delete a global identity owned by `user_id`. Returns the number of rows removed.
pub(crate) async fn delete_global_identity(
    conn: &libsql::Connection,
    user_id: i64,
    id: i64,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute(
            "DELETE FROM identities WHERE id = ?1 AND user_id = ?2",
            [id, user_id],
        )
        .await?)
}

impl LodeService {
    /// Register an identity provider installation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if `(provider_type, external_id)` already exists.
    pub async fn create_identity_provider(
        &self,
        provider_type: &str,
        external_id: &str,
    ) -> Result<IdentityProvider, DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO identity_providers (type, external_id) VALUES (?1, ?2)
                 RETURNING id, type, external_id",
                libsql::params![provider_type, external_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(IdentityProvider {
            id: row.get::<i64>(0)?,
            provider_type: row.get::<String>(1)?,
            external_id: row.get::<String>(2)?,
        })
    }

    /// Link a user to an identity provider.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the provider or user does not exist, or the
    /// user is already linked to this provider.
    pub async fn create_global_identity(
        &self,
        user_id: i64,
        idp_id: i64,
        external_id: &str,
    ) -> Result<GlobalIdentity, DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let now = Utc::now().to_rfc3339();
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO identities (idp_id, user_id, external_id, date_added, date_verified)
                 VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
                libsql::params![idp_id, user_id, external_id, now],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let id = row.get::<i64>(0)?;
        self.get_global_identity(id).await
    }

    /// Fetch one global identity by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if it does not exist.
    pub async fn get_global_identity(&self, id: i64) -> Result<GlobalIdentity, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("{GLOBAL_SELECT} WHERE i.id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_global(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_global_identities(
        &self,
        user_id: i64,
    ) -> Result<Vec<GlobalIdentity>, DatabaseError> {
        select_global_identities(self.db().conn(), user_id).await
    }
}
