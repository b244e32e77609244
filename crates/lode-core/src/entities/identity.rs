use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A social-auth login linked to a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SocialIdentity {
    pub id: i64,
    pub user_id: i64,
    /// Provider key, e.g. `github`, `bitbucket`.
    pub provider: String,
    /// The user's id at the provider.
    pub uid: String,
}

/// An installation of an external identity provider (a GitHub org, an
/// Azure DevOps tenant, a Google domain).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IdentityProvider {
    pub id: i64,
    /// Provider type, e.g. `github`.
    pub provider_type: String,
    pub external_id: String,
}

/// A product-wide identity backed by an identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GlobalIdentity {
    pub id: i64,
    pub user_id: i64,
    /// Identity provider type, e.g. `github`, `vsts`, `slack`.
    pub provider_type: String,
    /// External id of the provider installation (org, tenant, workspace).
    pub provider_external_id: String,
    /// The user's id at the provider.
    pub external_id: String,
    pub date_added: DateTime<Utc>,
    pub date_verified: DateTime<Utc>,
}

/// Flags on an organization's auth provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthProviderFlags {
    /// Members may keep their account after unlinking this SSO identity.
    pub allow_unlinked: bool,
    /// SCIM provisioning is enabled for the provider.
    pub scim_enabled: bool,
}

/// An organization's SSO configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthProvider {
    pub id: i64,
    pub organization_id: i64,
    /// Provider key, e.g. `google`, `okta`, `saml2`.
    pub provider: String,
    pub flags: AuthProviderFlags,
}

/// Minimal organization data carried on org identities.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OrganizationSummary {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

/// An SSO identity tied to one organization's auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OrgIdentity {
    pub id: i64,
    pub user_id: i64,
    /// The user's id at the SSO provider.
    pub ident: String,
    pub auth_provider: AuthProvider,
    pub organization: OrganizationSummary,
    pub date_added: DateTime<Utc>,
    pub last_verified: DateTime<Utc>,
    pub last_synced: DateTime<Utc>,
}
