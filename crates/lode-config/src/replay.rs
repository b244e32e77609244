//! Session-replay plugin configuration.
//!
//! Plugin settings are read-only and keyed by project id:
//!
//! ```toml
//! [replay]
//! self_hosted = false
//!
//! [replay.projects.42]
//! enabled = true
//! account_email = "ops@example.com"
//! api_token = "..."
//! website_id = "1337"
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Default vendor request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

const fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplayConfig {
    /// Whether this deployment is self-hosted. API and player URL overrides
    /// are only honored when set.
    #[serde(default)]
    pub self_hosted: bool,

    /// Timeout for each vendor HTTP request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-project plugin settings, keyed by project id.
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectReplayConfig>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            self_hosted: false,
            timeout_secs: default_timeout_secs(),
            projects: BTreeMap::new(),
        }
    }
}

impl ReplayConfig {
    /// Settings for `project_id` if the plugin is enabled and configured there.
    #[must_use]
    pub fn project(&self, project_id: &str) -> Option<&ProjectReplayConfig> {
        self.projects
            .get(project_id)
            .filter(|p| p.enabled && p.is_configured())
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ProjectReplayConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Vendor account email.
    #[serde(default, deserialize_with = "string_or_number")]
    pub account_email: String,

    /// Vendor API token. Redacted in `Debug` output.
    #[serde(default, deserialize_with = "string_or_number")]
    pub api_token: String,

    /// Id of the website in the vendor account. Accepts a string or a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub website_id: String,

    /// Self-hosted vendor REST API URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Self-hosted vendor session player URL.
    #[serde(default)]
    pub player_url: Option<String>,
}

impl Default for ProjectReplayConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            account_email: String::new(),
            api_token: String::new(),
            website_id: String::new(),
            api_url: None,
            player_url: None,
        }
    }
}

impl fmt::Debug for ProjectReplayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectReplayConfig")
            .field("enabled", &self.enabled)
            .field("account_email", &self.account_email)
            .field("api_token", &"[REDACTED]")
            .field("website_id", &self.website_id)
            .field("api_url", &self.api_url)
            .field("player_url", &self.player_url)
            .finish()
    }
}

impl ProjectReplayConfig {
    /// Check that the required fields are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.account_email.is_empty() && !self.api_token.is_empty() && !self.website_id.is_empty()
    }
}

/// Environment values that look like numbers or booleans reach serde typed,
/// so text fields take them back as their string form.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::UInt(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    })
}
