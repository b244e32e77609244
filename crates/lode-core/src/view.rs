//! The wrapped identity view returned by the identity API.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

use crate::entities::{GlobalIdentity, OrgIdentity, OrganizationSummary, SocialIdentity};
use crate::enums::{DisconnectStatus, IdentityCategory};
use crate::providers::{LoginProviders, display_name};

/// Provider key plus its human-readable name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProviderSummary {
    pub key: String,
    pub name: String,
}

impl ProviderSummary {
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            name: display_name(key),
        }
    }
}

/// One identity of a user, with its computed disconnect status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentityConfig {
    pub category: IdentityCategory,
    /// Row id in the category's table. Sent as a string on the wire.
    #[serde(serialize_with = "id_as_string", deserialize_with = "id_from_string")]
    #[schemars(with = "String")]
    pub id: i64,
    pub provider: ProviderSummary,
    /// Provider-side identifier shown to the user.
    pub name: String,
    pub status: DisconnectStatus,
    /// Whether this identity can be used to log in.
    pub is_login: bool,
    pub organization: Option<OrganizationSummary>,
    pub date_added: Option<DateTime<Utc>>,
    pub date_verified: Option<DateTime<Utc>>,
    pub date_synced: Option<DateTime<Utc>>,
}

impl UserIdentityConfig {
    pub(crate) fn wrap_social(s: &SocialIdentity, status: DisconnectStatus) -> Self {
        Self {
            category: IdentityCategory::SocialIdentity,
            id: s.id,
            provider: ProviderSummary::from_key(&s.provider),
            name: s.uid.clone(),
            status,
            is_login: false,
            organization: None,
            date_added: None,
            date_verified: None,
            date_synced: None,
        }
    }

    pub(crate) fn wrap_global(
        g: &GlobalIdentity,
        status: DisconnectStatus,
        login: &LoginProviders,
    ) -> Self {
        Self {
            category: IdentityCategory::GlobalIdentity,
            id: g.id,
            provider: ProviderSummary::from_key(&g.provider_type),
            name: g.external_id.clone(),
            status,
            is_login: login.supports_login(&g.provider_type),
            organization: None,
            date_added: Some(g.date_added),
            date_verified: Some(g.date_verified),
            date_synced: None,
        }
    }

    pub(crate) fn wrap_org(o: &OrgIdentity, status: DisconnectStatus) -> Self {
        Self {
            category: IdentityCategory::OrgIdentity,
            id: o.id,
            provider: ProviderSummary::from_key(&o.auth_provider.provider),
            name: o.ident.clone(),
            status,
            is_login: true,
            organization: Some(o.organization.clone()),
            date_added: Some(o.date_added),
            date_verified: Some(o.last_verified),
            date_synced: Some(o.last_synced),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn id_as_string<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

fn id_from_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
