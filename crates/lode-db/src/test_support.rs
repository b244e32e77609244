//! Shared test utilities for lode-db tests.

pub(crate) mod helpers {
    use lode_core::entities::{AuthProviderFlags, OrgIdentity, User};
    use lode_core::providers::LoginProviders;

    use crate::LodeService;

    /// Create an in-memory service with the default login providers.
    pub async fn test_service() -> LodeService {
        LodeService::new_local(":memory:", LoginProviders::default())
            .await
            .unwrap()
    }

    /// Create a user with or without a usable password.
    pub async fn test_user(svc: &LodeService, username: &str, has_password: bool) -> User {
        let password = has_password.then_some("argon2id$v=19$test");
        svc.create_user(username, password).await.unwrap()
    }

    /// Link a global identity for `user_id` through a fresh identity provider.
    pub async fn link_global(
        svc: &LodeService,
        user_id: i64,
        provider_type: &str,
        external_id: &str,
    ) -> lode_core::entities::GlobalIdentity {
        let idp = svc
            .create_identity_provider(provider_type, &format!("{provider_type}-{external_id}"))
            .await
            .unwrap();
        svc.create_global_identity(user_id, idp.id, external_id)
            .await
            .unwrap()
    }

    /// Create an organization with an SSO provider and link `user_id` to it.
    ///
    /// Each call creates a new organization, so `slug` must be unique per test.
    pub async fn link_org(
        svc: &LodeService,
        user_id: i64,
        slug: &str,
        allow_unlinked: bool,
    ) -> OrgIdentity {
        let org = svc
            .create_organization(slug, &slug.to_uppercase())
            .await
            .unwrap();
        let provider = svc
            .create_auth_provider(
                org.id,
                "okta",
                AuthProviderFlags {
                    allow_unlinked,
                    scim_enabled: false,
                },
            )
            .await
            .unwrap();
        svc.create_org_identity(user_id, provider.id, &format!("user-{user_id}@{slug}"))
            .await
            .unwrap()
    }
}
