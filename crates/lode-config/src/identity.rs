//! Identity aggregation settings.

use serde::{Deserialize, Serialize};

fn default_login_providers() -> Vec<String> {
    vec!["github".into(), "vsts".into(), "google".into()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Identity provider types whose global identities can be used to log in.
    #[serde(default = "default_login_providers")]
    pub login_providers: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            login_providers: default_login_providers(),
        }
    }
}
