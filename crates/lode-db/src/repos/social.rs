//! Social-auth identity repository.

use lode_core::entities::SocialIdentity;

use crate::error::DatabaseError;
use crate::service::LodeService;

fn row_to_social(row: &libsql::Row) -> Result<SocialIdentity, DatabaseError> {
    Ok(SocialIdentity {
        id: row.get::<i64>(0)?,
        user_id: row.get::<i64>(1)?,
        provider: row.get::<String>(2)?,
        uid: row.get::<String>(3)?,
    })
}

/// All social identities of `user_id`, oldest first.
pub(crate) async fn select_social_identities(
    conn: &libsql::Connection,
    user_id: i64,
) -> Result<Vec<SocialIdentity>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, user_id, provider, uid FROM social_identities
             WHERE user_id = ?1 ORDER BY id",
            [user_id],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_social(&row)?);
    }
    Ok(results)
}

/// Delete a social identity owned by `user_id`. Returns the number of rows removed.
pub(crate) async fn delete_social_identity(
    conn: &libsql::Connection,
    user_id: i64,
    id: i64,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute(
            "DELETE FROM social_identities WHERE id = ?1 AND user_id = ?2",
            [id, user_id],
        )
        .await?)
}

impl LodeService {
    /// Link a social-auth login to a user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the `(provider, uid)` pair is already linked
    /// or the user does not exist.
    pub async fn create_social_identity(
        &self,
        user_id: i64,
        provider: &str,
        uid: &str,
    ) -> Result<SocialIdentity, DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO social_identities (user_id, provider, uid) VALUES (?1, ?2, ?3)
                 RETURNING id, user_id, provider, uid",
                libsql::params![user_id, provider, uid],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_social(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_social_identities(
        &self,
        user_id: i64,
    ) -> Result<Vec<SocialIdentity>, DatabaseError> {
        select_social_identities(self.db().conn(), user_id).await
    }
}
