//! Organization, auth provider, and org identity repository.

use chrono::Utc;
use lode_core::entities::{AuthProvider, AuthProviderFlags, OrgIdentity, OrganizationSummary};

use crate::error::DatabaseError;
use crate::helpers::{get_flag, parse_datetime};
use crate::service::LodeService;

const ORG_IDENTITY_SELECT: &str = "SELECT a.id, a.user_id, a.ident, a.date_added, a.last_verified, a.last_synced,
            p.id, p.organization_id, p.provider, p.allow_unlinked, p.scim_enabled,
            o.id, o.slug, o.name
     FROM auth_identities a
     JOIN auth_providers p ON p.id = a.auth_provider_id
     JOIN organizations o ON o.id = p.organization_id";

fn row_to_org_identity(row: &libsql::Row) -> Result<OrgIdentity, DatabaseError> {
    Ok(OrgIdentity {
        id: row.get::<i64>(0)?,
        user_id: row.get::<i64>(1)?,
        ident: row.get::<String>(2)?,
        date_added: parse_datetime(&row.get::<String>(3)?)?,
        last_verified: parse_datetime(&row.get::<String>(4)?)?,
        last_synced: parse_datetime(&row.get::<String>(5)?)?,
        auth_provider: AuthProvider {
            id: row.get::<i64>(6)?,
            organization_id: row.get::<i64>(7)?,
            provider: row.get::<String>(8)?,
            flags: AuthProviderFlags {
                allow_unlinked: get_flag(row, 9)?,
                scim_enabled: get_flag(row, 10)?,
            },
        },
        organization: OrganizationSummary {
            id: row.get::<i64>(11)?,
            slug: row.get::<String>(12)?,
            name: row.get::<String>(13)?,
        },
    })
}

fn row_to_auth_provider(row: &libsql::Row) -> Result<AuthProvider, DatabaseError> {
    Ok(AuthProvider {
        id: row.get::<i64>(0)?,
        organization_id: row.get::<i64>(1)?,
        provider: row.get::<String>(2)?,
        flags: AuthProviderFlags {
            allow_unlinked: get_flag(row, 3)?,
            scim_enabled: get_flag(row, 4)?,
        },
    })
}

/// All org identities of `user_id` with their provider and organization, oldest first.
pub(crate) async fn select_org_identities(
    conn: &libsql::Connection,
    user_id: i64,
) -> Result<Vec<OrgIdentity>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("{ORG_IDENTITY_SELECT} WHERE a.user_id = ?1 ORDER BY a.id"),
            [user_id],
        )
        .await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(row_to_org_identity(&row)?);
    }
    Ok(results)
}

/// Delete an org identity owned by `user_id`. Returns the number of rows removed.
pub(crate) async fn delete_org_identity(
    conn: &libsql::Connection,
    user_id: i64,
    id: i64,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute(
            "DELETE FROM auth_identities WHERE id = ?1 AND user_id = ?2",
            [id, user_id],
        )
        .await?)
}

impl LodeService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the slug is taken.
    pub async fn create_organization(
        &self,
        slug: &str,
        name: &str,
    ) -> Result<OrganizationSummary, DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO organizations (slug, name) VALUES (?1, ?2) RETURNING id, slug, name",
                libsql::params![slug, name],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(OrganizationSummary {
            id: row.get::<i64>(0)?,
            slug: row.get::<String>(1)?,
            name: row.get::<String>(2)?,
        })
    }

    /// Configure SSO for an organization. One provider per organization.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the organization already has a provider or
    /// does not exist.
    pub async fn create_auth_provider(
        &self,
        organization_id: i64,
        provider: &str,
        flags: AuthProviderFlags,
    ) -> Result<AuthProvider, DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO auth_providers (organization_id, provider, allow_unlinked, scim_enabled)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, organization_id, provider, allow_unlinked, scim_enabled",
                libsql::params![
                    organization_id,
                    provider,
                    flags.allow_unlinked,
                    flags.scim_enabled
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_auth_provider(&row)
    }

    /// Change the flags of an organization's auth provider.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the provider does not exist.
    pub async fn update_auth_provider_flags(
        &self,
        auth_provider_id: i64,
        flags: AuthProviderFlags,
    ) -> Result<(), DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE auth_providers SET allow_unlinked = ?2, scim_enabled = ?3 WHERE id = ?1",
                libsql::params![auth_provider_id, flags.allow_unlinked, flags.scim_enabled],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// Link a user to an organization's SSO provider.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the user already has an identity for this
    /// provider or the provider does not exist.
    pub async fn create_org_identity(
        &self,
        user_id: i64,
        auth_provider_id: i64,
        ident: &str,
    ) -> Result<OrgIdentity, DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let now = Utc::now().to_rfc3339();
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO auth_identities (user_id, auth_provider_id, ident, date_added, last_verified, last_synced)
                 VALUES (?1, ?2, ?3, ?4, ?4, ?4) RETURNING id",
                libsql::params![user_id, auth_provider_id, ident, now],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let id = row.get::<i64>(0)?;

        let mut rows = self
            .db()
            .conn()
            .query(&format!("{ORG_IDENTITY_SELECT} WHERE a.id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_org_identity(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_org_identities(
        &self,
        user_id: i64,
    ) -> Result<Vec<OrgIdentity>, DatabaseError> {
        select_org_identities(self.db().conn(), user_id).await
    }
}
