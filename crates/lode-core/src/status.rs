//! Disconnect-status rules.
//!
//! Every rule is a pure function of the user's login state and the flags of
//! the identity in question. Org identities from other organizations are not
//! counted as fallback login means.

use crate::enums::DisconnectStatus;

/// The parts of a user's state that decide whether an identity is removable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginState {
    /// The user has a usable password.
    pub has_password: bool,
    /// Number of the user's global identities that support login.
    pub global_login_count: usize,
}

impl LoginState {
    #[must_use]
    pub const fn new(has_password: bool, global_login_count: usize) -> Self {
        Self {
            has_password,
            global_login_count,
        }
    }
}

/// Social identities never guard login.
#[must_use]
pub const fn social_identity_status() -> DisconnectStatus {
    DisconnectStatus::CanDisconnect
}

/// Status of a global identity.
///
/// A login-capable global identity is removable when the user has a password
/// or at least one other login-capable global identity.
#[must_use]
pub const fn global_identity_status(state: LoginState, supports_login: bool) -> DisconnectStatus {
    if !supports_login || state.has_password || state.global_login_count > 1 {
        DisconnectStatus::CanDisconnect
    } else {
        DisconnectStatus::NeededForGlobalAuth
    }
}

/// Status of an org identity.
///
/// Providers that forbid unlinked members pin the identity. Otherwise it is
/// removable when the user can still log in with a password or any global
/// login identity.
#[must_use]
pub const fn org_identity_status(state: LoginState, allow_unlinked: bool) -> DisconnectStatus {
    if !allow_unlinked {
        DisconnectStatus::NeededForOrgAuth
    } else if state.has_password || state.global_login_count > 0 {
        DisconnectStatus::CanDisconnect
    } else {
        DisconnectStatus::NeededForGlobalAuth
    }
}
