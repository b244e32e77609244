//! Entity structs for users and their linked identities.
//!
//! Each struct maps to one table in the libSQL store (see `lode-db`).

mod identity;
mod user;

pub use identity::{
    AuthProvider, AuthProviderFlags, GlobalIdentity, IdentityProvider, OrgIdentity,
    OrganizationSummary, SocialIdentity,
};
pub use user::User;
