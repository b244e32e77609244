//! Builds the decorated union of a user's identities.
//!
//! Statuses depend on the whole identity set (password state and the count
//! of global login identities), so lookups always go through the full union.

use crate::entities::{GlobalIdentity, OrgIdentity, SocialIdentity};
use crate::enums::IdentityCategory;
use crate::providers::LoginProviders;
use crate::status::{
    LoginState, global_identity_status, org_identity_status, social_identity_status,
};
use crate::view::UserIdentityConfig;

/// Every identity record owned by one user, grouped by backing table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySet {
    pub social: Vec<SocialIdentity>,
    pub global: Vec<GlobalIdentity>,
    pub org: Vec<OrgIdentity>,
}

impl IdentitySet {
    /// Number of global identities that can be used to log in.
    #[must_use]
    pub fn global_login_count(&self, login: &LoginProviders) -> usize {
        self.global
            .iter()
            .filter(|g| login.supports_login(&g.provider_type))
            .count()
    }
}

/// Lazily wrap every identity in `set` with its disconnect status.
///
/// Order is social, then global, then org identities, each in the order
/// they appear in `set`.
pub fn resolve_identities<'a>(
    has_password: bool,
    set: &'a IdentitySet,
    login: &'a LoginProviders,
) -> impl Iterator<Item = UserIdentityConfig> + 'a {
    let state = LoginState::new(has_password, set.global_login_count(login));

    let social = set
        .social
        .iter()
        .map(|s| UserIdentityConfig::wrap_social(s, social_identity_status()));
    let global = set.global.iter().map(move |g| {
        let status = global_identity_status(state, login.supports_login(&g.provider_type));
        UserIdentityConfig::wrap_global(g, status, login)
    });
    let org = set.org.iter().map(move |o| {
        let status = org_identity_status(state, o.auth_provider.flags.allow_unlinked);
        UserIdentityConfig::wrap_org(o, status)
    });

    social.chain(global).chain(org)
}

/// Linear scan for one identity by category and id.
pub fn find_identity<I>(identities: I, category: IdentityCategory, id: i64) -> Option<UserIdentityConfig>
where
    I: IntoIterator<Item = UserIdentityConfig>,
{
    identities
        .into_iter()
        .find(|identity| identity.category == category && identity.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AuthProvider, AuthProviderFlags, OrganizationSummary};
    use crate::enums::DisconnectStatus;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn social(id: i64) -> SocialIdentity {
        SocialIdentity {
            id,
            user_id: 1,
            provider: "github".into(),
            uid: format!("uid-{id}"),
        }
    }

    fn global(id: i64, provider_type: &str) -> GlobalIdentity {
        GlobalIdentity {
            id,
            user_id: 1,
            provider_type: provider_type.into(),
            provider_external_id: "ext".into(),
            external_id: format!("user-{id}"),
            date_added: Utc::now(),
            date_verified: Utc::now(),
        }
    }

    fn org(id: i64, allow_unlinked: bool) -> OrgIdentity {
        OrgIdentity {
            id,
            user_id: 1,
            ident: format!("sso-{id}"),
            auth_provider: AuthProvider {
                id: 100 + id,
                organization_id: 9,
                provider: "okta".into(),
                flags: AuthProviderFlags {
                    allow_unlinked,
                    scim_enabled: false,
                },
            },
            organization: OrganizationSummary {
                id: 9,
                slug: "acme".into(),
                name: "Acme".into(),
            },
            date_added: Utc::now(),
            last_verified: Utc::now(),
            last_synced: Utc::now(),
        }
    }

    fn statuses(has_password: bool, set: &IdentitySet) -> Vec<(IdentityCategory, i64, DisconnectStatus)> {
        let login = LoginProviders::default();
        resolve_identities(has_password, set, &login)
            .map(|i| (i.category, i.id, i.status))
            .collect()
    }

    #[test]
    fn union_order_is_social_global_org() {
        let set = IdentitySet {
            social: vec![social(1)],
            global: vec![global(2, "github")],
            org: vec![org(3, true)],
        };
        let categories: Vec<_> = statuses(true, &set).into_iter().map(|(c, _, _)| c).collect();
        assert_eq!(
            categories,
            vec![
                IdentityCategory::SocialIdentity,
                IdentityCategory::GlobalIdentity,
                IdentityCategory::OrgIdentity,
            ]
        );
    }

    #[test]
    fn single_global_login_is_needed_without_password() {
        let mut set = IdentitySet {
            global: vec![global(1, "github")],
            ..Default::default()
        };
        assert_eq!(
            statuses(false, &set),
            vec![(IdentityCategory::GlobalIdentity, 1, DisconnectStatus::NeededForGlobalAuth)]
        );

        set.global.push(global(2, "google"));
        let result = statuses(false, &set);
        assert_eq!(result[0].2, DisconnectStatus::CanDisconnect);
        assert_eq!(result[1].2, DisconnectStatus::CanDisconnect);
    }

    #[test]
    fn non_login_global_does_not_count() {
        let set = IdentitySet {
            global: vec![global(1, "github"), global(2, "slack")],
            ..Default::default()
        };
        let result = statuses(false, &set);
        assert_eq!(result[0].2, DisconnectStatus::NeededForGlobalAuth);
        assert_eq!(result[1].2, DisconnectStatus::CanDisconnect);
    }

    #[test]
    fn password_frees_every_global_identity() {
        let set = IdentitySet {
            global: vec![global(1, "github")],
            ..Default::default()
        };
        assert_eq!(statuses(true, &set)[0].2, DisconnectStatus::CanDisconnect);
    }

    #[test]
    fn org_identity_pinned_by_provider() {
        let set = IdentitySet {
            global: vec![global(1, "github"), global(2, "vsts")],
            org: vec![org(3, false)],
            ..Default::default()
        };
        for has_password in [true, false] {
            assert_eq!(statuses(has_password, &set)[2].2, DisconnectStatus::NeededForOrgAuth);
        }
    }

    #[test]
    fn lone_org_identity_is_needed_for_global_auth() {
        let set = IdentitySet {
            social: vec![social(1)],
            org: vec![org(2, true)],
            ..Default::default()
        };
        let result = statuses(false, &set);
        assert_eq!(result[0].2, DisconnectStatus::CanDisconnect);
        assert_eq!(result[1].2, DisconnectStatus::NeededForGlobalAuth);
    }

    #[test]
    fn find_matches_category_and_id() {
        let set = IdentitySet {
            social: vec![social(5)],
            global: vec![global(5, "github")],
            ..Default::default()
        };
        let login = LoginProviders::default();

        let found = find_identity(
            resolve_identities(false, &set, &login),
            IdentityCategory::GlobalIdentity,
            5,
        )
        .unwrap();
        assert_eq!(found.category, IdentityCategory::GlobalIdentity);
        assert_eq!(found.status, DisconnectStatus::NeededForGlobalAuth);

        assert!(
            find_identity(
                resolve_identities(false, &set, &login),
                IdentityCategory::OrgIdentity,
                5
            )
            .is_none()
        );
    }

    #[test]
    fn empty_set() {
        let set = IdentitySet::default();
        assert_eq!(set.global_login_count(&LoginProviders::default()), 0);
        assert!(statuses(false, &set).is_empty());
    }
}
