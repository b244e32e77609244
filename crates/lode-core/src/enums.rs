//! Category tags and disconnect statuses.
//!
//! `IdentityCategory` serializes as the kebab-case tag used in URLs
//! (`social-identity`, `global-identity`, `org-identity`).
//! `DisconnectStatus` serializes as `snake_case`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// IdentityCategory
// ---------------------------------------------------------------------------

/// Which backing table an identity record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityCategory {
    /// Social-auth login linked to the user account.
    SocialIdentity,
    /// Product-wide login identity, independent of any organization.
    GlobalIdentity,
    /// SSO identity bound to one organization's auth provider.
    OrgIdentity,
}

impl IdentityCategory {
    /// Every category, in the order the resolver emits them.
    pub const ALL: [Self; 3] = [Self::SocialIdentity, Self::GlobalIdentity, Self::OrgIdentity];

    /// Return the tag used in URLs and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SocialIdentity => "social-identity",
            Self::GlobalIdentity => "global-identity",
            Self::OrgIdentity => "org-identity",
        }
    }
}

impl fmt::Display for IdentityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentityCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// DisconnectStatus
// ---------------------------------------------------------------------------

/// Whether the user may remove an identity without losing every way to log in.
///
/// Computed on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectStatus {
    CanDisconnect,
    NeededForGlobalAuth,
    NeededForOrgAuth,
}

impl DisconnectStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CanDisconnect => "can_disconnect",
            Self::NeededForGlobalAuth => "needed_for_global_auth",
            Self::NeededForOrgAuth => "needed_for_org_auth",
        }
    }

    #[must_use]
    pub const fn can_disconnect(self) -> bool {
        matches!(self, Self::CanDisconnect)
    }
}

impl fmt::Display for DisconnectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
