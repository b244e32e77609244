//! Provider display names and the set of login-capable identity providers.

use std::collections::BTreeSet;

/// Identity provider types that may be used to log in by default.
pub const DEFAULT_LOGIN_PROVIDERS: [&str; 3] = ["github", "vsts", "google"];

/// Known provider keys and their display names.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("asana", "Asana"),
    ("bitbucket", "Bitbucket"),
    ("github", "GitHub"),
    ("github_enterprise", "GitHub Enterprise"),
    ("gitlab", "GitLab"),
    ("google", "Google"),
    ("jira", "Jira"),
    ("okta", "Okta"),
    ("saml2", "SAML2"),
    ("slack", "Slack"),
    ("trello", "Trello"),
    ("visualstudio", "Visual Studio"),
    ("vsts", "Azure DevOps"),
];

/// Display name for a provider key.
///
/// Unknown keys are title-cased word by word (`my_idp` → `My Idp`).
#[must_use]
pub fn display_name(key: &str) -> String {
    if let Some((_, name)) = DISPLAY_NAMES.iter().find(|(k, _)| *k == key) {
        return (*name).to_string();
    }
    key.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The set of identity provider types whose global identities support login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginProviders(BTreeSet<String>);

impl LoginProviders {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    /// Whether a global identity from `provider_type` can be used to log in.
    #[must_use]
    pub fn supports_login(&self, provider_type: &str) -> bool {
        self.0.contains(provider_type)
    }
}

impl Default for LoginProviders {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PROVIDERS)
    }
}
