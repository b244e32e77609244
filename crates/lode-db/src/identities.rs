//! Identity aggregation and disconnect.
//!
//! Reads the three identity tables for one user, decorates every record with
//! its disconnect status, and deletes a record only when its status allows.

use lode_core::entities::User;
use lode_core::{
    IdentityCategory, IdentitySet, UserIdentityConfig, find_identity, resolve_identities,
};

use crate::error::{DatabaseError, IdentityError};
use crate::repos::global::{delete_global_identity, select_global_identities};
use crate::repos::org::{delete_org_identity, select_org_identities};
use crate::repos::social::{delete_social_identity, select_social_identities};
use crate::repos::users::select_user;
use crate::service::LodeService;

/// Load every identity owned by `user_id` on `conn`.
async fn load_identity_set(
    conn: &libsql::Connection,
    user_id: i64,
) -> Result<IdentitySet, DatabaseError> {
    Ok(IdentitySet {
        social: select_social_identities(conn, user_id).await?,
        global: select_global_identities(conn, user_id).await?,
        org: select_org_identities(conn, user_id).await?,
    })
}

async fn load_user_and_set(
    conn: &libsql::Connection,
    user_id: i64,
) -> Result<(User, IdentitySet), IdentityError> {
    let user = select_user(conn, user_id)
        .await?
        .ok_or(IdentityError::UserNotFound(user_id))?;
    let set = load_identity_set(conn, user_id).await?;
    Ok((user, set))
}

async fn delete_record(
    conn: &libsql::Connection,
    user_id: i64,
    category: IdentityCategory,
    id: i64,
) -> Result<u64, DatabaseError> {
    match category {
        IdentityCategory::SocialIdentity => delete_social_identity(conn, user_id, id).await,
        IdentityCategory::GlobalIdentity => delete_global_identity(conn, user_id, id).await,
        IdentityCategory::OrgIdentity => delete_org_identity(conn, user_id, id).await,
    }
}

impl LodeService {
    /// Every identity of the user with its disconnect status, social first,
    /// then global, then org.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::UserNotFound` for an unknown user, or
    /// `IdentityError::Database` if a query fails.
    pub async fn get_identities(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserIdentityConfig>, IdentityError> {
        let (user, set) = {
            let _guard = self.write_lock().lock().await;
            load_user_and_set(self.db().conn(), user_id).await?
        };
        Ok(resolve_identities(user.has_usable_password(), &set, self.login_providers()).collect())
    }

    /// One identity of the user, looked up by category and id.
    ///
    /// The status is computed against the whole identity set.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::NotFound` if the user has no such identity
    /// (including when the user does not exist).
    pub async fn get_identity(
        &self,
        user_id: i64,
        category: IdentityCategory,
        id: i64,
    ) -> Result<UserIdentityConfig, IdentityError> {
        let loaded = {
            let _guard = self.write_lock().lock().await;
            load_user_and_set(self.db().conn(), user_id).await
        };
        let (user, set) = match loaded {
            Ok(loaded) => loaded,
            Err(IdentityError::UserNotFound(_)) => {
                return Err(IdentityError::NotFound { category, id });
            }
            Err(e) => return Err(e),
        };
        find_identity(
            resolve_identities(user.has_usable_password(), &set, self.login_providers()),
            category,
            id,
        )
        .ok_or(IdentityError::NotFound { category, id })
    }

    /// Delete one identity of the user if its status is `can_disconnect`.
    ///
    /// The status check and the delete run in one `IMMEDIATE` transaction
    /// while holding the service write lock. Two concurrent disconnects
    /// cannot both pass the check, and no other write can join or be rolled
    /// back with the transaction.
    ///
    /// # Errors
    ///
    /// - `IdentityError::NotFound` if the user has no such identity.
    /// - `IdentityError::NotDisconnectable` if removing it would lock the
    ///   user out. Nothing is deleted.
    /// - `IdentityError::Database` on storage failure.
    pub async fn disconnect_identity(
        &self,
        user_id: i64,
        category: IdentityCategory,
        id: i64,
    ) -> Result<(), IdentityError> {
        let _guard = self.write_lock().lock().await;
        let tx = self.db().begin_immediate().await?;

        let (user, set) = match load_user_and_set(&tx, user_id).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tx.rollback().await?;
                return Err(match e {
                    IdentityError::UserNotFound(_) => IdentityError::NotFound { category, id },
                    other => other,
                });
            }
        };

        let Some(identity) = find_identity(
            resolve_identities(user.has_usable_password(), &set, self.login_providers()),
            category,
            id,
        ) else {
            tx.rollback().await?;
            return Err(IdentityError::NotFound { category, id });
        };

        if !identity.status.can_disconnect() {
            tx.rollback().await?;
            tracing::info!(
                user_id,
                %category,
                id,
                status = %identity.status,
                "refused identity disconnect"
            );
            return Err(IdentityError::NotDisconnectable {
                category,
                id,
                status: identity.status,
            });
        }

        let deleted = delete_record(&tx, user_id, category, id).await?;
        if deleted == 0 {
            tx.rollback().await?;
            return Err(IdentityError::NotFound { category, id });
        }
        tx.commit().await?;

        tracing::info!(user_id, %category, id, "disconnected identity");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{link_global, link_org, test_service, test_user};
    use lode_core::DisconnectStatus;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn unknown_user() {
        let svc = test_service().await;
        assert!(matches!(
            svc.get_identities(404).await.unwrap_err(),
            IdentityError::UserNotFound(404)
        ));
        assert!(matches!(
            svc.get_identity(404, IdentityCategory::SocialIdentity, 1)
                .await
                .unwrap_err(),
            IdentityError::NotFound { .. }
        ));
        assert!(matches!(
            svc.disconnect_identity(404, IdentityCategory::SocialIdentity, 1)
                .await
                .unwrap_err(),
            IdentityError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn user_without_identities_has_empty_list() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", true).await;
        assert!(svc.get_identities(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_in_category_order() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", true).await;
        let org = link_org(&svc, user.id, "acme", true).await;
        let global = link_global(&svc, user.id, "github", "octo").await;
        let social = svc
            .create_social_identity(user.id, "github", "octocat")
            .await
            .unwrap();

        let listed: Vec<_> = svc
            .get_identities(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| (i.category, i.id))
            .collect();
        assert_eq!(
            listed,
            vec![
                (IdentityCategory::SocialIdentity, social.id),
                (IdentityCategory::GlobalIdentity, global.id),
                (IdentityCategory::OrgIdentity, org.id),
            ]
        );
    }

    #[tokio::test]
    async fn single_item_matches_list_entry() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", false).await;
        let global = link_global(&svc, user.id, "github", "octo").await;
        link_org(&svc, user.id, "acme", true).await;

        let list = svc.get_identities(user.id).await.unwrap();
        let single = svc
            .get_identity(user.id, IdentityCategory::GlobalIdentity, global.id)
            .await
            .unwrap();
        assert_eq!(list[0], single);
        assert_eq!(single.status, DisconnectStatus::NeededForGlobalAuth);
    }

    #[tokio::test]
    async fn same_id_in_other_category_is_not_found() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", true).await;
        let social = svc
            .create_social_identity(user.id, "github", "octocat")
            .await
            .unwrap();

        let err = svc
            .get_identity(user.id, IdentityCategory::OrgIdentity, social.id)
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NotFound { .. }));
    }

    #[tokio::test]
    async fn other_users_identity_is_not_found() {
        let svc = test_service().await;
        let alice = test_user(&svc, "alice", true).await;
        let bob = test_user(&svc, "bob", true).await;
        let social = svc
            .create_social_identity(alice.id, "github", "octocat")
            .await
            .unwrap();

        let err = svc
            .disconnect_identity(bob.id, IdentityCategory::SocialIdentity, social.id)
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NotFound { .. }));
        assert_eq!(svc.list_social_identities(alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn disconnect_social_always_allowed() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", false).await;
        let social = svc
            .create_social_identity(user.id, "github", "octocat")
            .await
            .unwrap();

        svc.disconnect_identity(user.id, IdentityCategory::SocialIdentity, social.id)
            .await
            .unwrap();
        assert!(svc.get_identities(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn refuses_last_login_identity() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", false).await;
        let global = link_global(&svc, user.id, "github", "octo").await;

        let err = svc
            .disconnect_identity(user.id, IdentityCategory::GlobalIdentity, global.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IdentityError::NotDisconnectable {
                status: DisconnectStatus::NeededForGlobalAuth,
                ..
            }
        ));
        assert_eq!(svc.list_global_identities(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refuses_org_identity_pinned_by_provider() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", true).await;
        let org = link_org(&svc, user.id, "acme", false).await;

        let err = svc
            .disconnect_identity(user.id, IdentityCategory::OrgIdentity, org.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IdentityError::NotDisconnectable {
                status: DisconnectStatus::NeededForOrgAuth,
                ..
            }
        ));
        assert_eq!(svc.list_org_identities(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_login_identity_becomes_needed_after_first_is_removed() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", false).await;
        let first = link_global(&svc, user.id, "github", "octo").await;
        let second = link_global(&svc, user.id, "google", "octo@example.com").await;

        svc.disconnect_identity(user.id, IdentityCategory::GlobalIdentity, first.id)
            .await
            .unwrap();

        let err = svc
            .disconnect_identity(user.id, IdentityCategory::GlobalIdentity, second.id)
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::NotDisconnectable { .. }));
    }

    #[tokio::test]
    async fn password_change_is_seen_by_next_check() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", false).await;
        let global = link_global(&svc, user.id, "github", "octo").await;

        svc.set_password(user.id, Some("argon2id$v=19$new"))
            .await
            .unwrap();
        svc.disconnect_identity(user.id, IdentityCategory::GlobalIdentity, global.id)
            .await
            .unwrap();
        assert!(svc.list_global_identities(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_disconnects_leave_one_login() {
        let svc = std::sync::Arc::new(test_service().await);
        let user = test_user(&svc, "alice", false).await;
        let a = link_global(&svc, user.id, "github", "octo").await;
        let b = link_global(&svc, user.id, "google", "octo@example.com").await;
        let (user_id, a_id, b_id) = (user.id, a.id, b.id);

        let first = {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.disconnect_identity(user_id, IdentityCategory::GlobalIdentity, a_id)
                    .await
            })
        };
        let second = {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.disconnect_identity(user_id, IdentityCategory::GlobalIdentity, b_id)
                    .await
            })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(svc.list_global_identities(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn password_set_during_refused_disconnect_survives() {
        let svc = std::sync::Arc::new(test_service().await);
        let user = test_user(&svc, "alice", false).await;
        let pinned = link_org(&svc, user.id, "acme", false).await;
        let (user_id, pinned_id) = (user.id, pinned.id);

        let disconnect = {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.disconnect_identity(user_id, IdentityCategory::OrgIdentity, pinned_id)
                    .await
            })
        };
        let password = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.set_password(user_id, Some("argon2id$v=19$new")).await })
        };

        assert!(matches!(
            disconnect.await.unwrap().unwrap_err(),
            IdentityError::NotDisconnectable {
                status: DisconnectStatus::NeededForOrgAuth,
                ..
            }
        ));
        password.await.unwrap().unwrap();
        assert!(svc.get_user(user_id).await.unwrap().has_usable_password());
        assert_eq!(svc.list_org_identities(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn writes_interleaved_with_refused_disconnects_are_kept() {
        let svc = test_service().await;
        let user = test_user(&svc, "alice", false).await;
        let global = link_global(&svc, user.id, "github", "octo").await;

        let (refused, created) = tokio::join!(
            svc.disconnect_identity(user.id, IdentityCategory::GlobalIdentity, global.id),
            svc.create_social_identity(user.id, "bitbucket", "alice-bb"),
        );
        assert!(matches!(
            refused.unwrap_err(),
            IdentityError::NotDisconnectable { .. }
        ));
        let social = created.unwrap();

        let listed = svc.get_identities(user.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, social.id);
    }
}
