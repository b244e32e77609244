//! Resolved per-project vendor settings.

use lode_config::ProjectReplayConfig;
use secrecy::SecretString;

/// Vendor REST API used when no self-hosted override is set.
pub const DEFAULT_API_URL: &str = "https://api.sessionstack.com";

/// Vendor session player used when no self-hosted override is set.
pub const DEFAULT_PLAYER_URL: &str = "https://app.sessionstack.com/player";

/// Credentials and endpoints for one vendor website.
#[derive(Debug, Clone)]
pub struct ReplaySettings {
    pub account_email: String,
    pub api_token: SecretString,
    pub website_id: String,
    api_url: String,
    player_url: String,
}

impl ReplaySettings {
    #[must_use]
    pub fn new(
        account_email: impl Into<String>,
        api_token: impl Into<String>,
        website_id: impl Into<String>,
    ) -> Self {
        Self {
            account_email: account_email.into(),
            api_token: SecretString::from(api_token.into()),
            website_id: website_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            player_url: DEFAULT_PLAYER_URL.to_string(),
        }
    }

    /// Point the client at another vendor API. Blank values keep the default.
    #[must_use]
    pub fn with_api_url(mut self, url: &str) -> Self {
        if let Some(url) = normalize_url(url) {
            self.api_url = url;
        }
        self
    }

    /// Point session links at another player. Blank values keep the default.
    #[must_use]
    pub fn with_player_url(mut self, url: &str) -> Self {
        if let Some(url) = normalize_url(url) {
            self.player_url = url;
        }
        self
    }

    /// Build settings from project configuration.
    ///
    /// URL overrides are only applied on self-hosted deployments; elsewhere
    /// they are dropped with a warning.
    #[must_use]
    pub fn from_project(config: &ProjectReplayConfig, self_hosted: bool) -> Self {
        let settings = Self::new(
            config.account_email.clone(),
            config.api_token.clone(),
            config.website_id.clone(),
        );

        let api_url = config.api_url.as_deref().unwrap_or_default();
        let player_url = config.player_url.as_deref().unwrap_or_default();
        if self_hosted {
            return settings.with_api_url(api_url).with_player_url(player_url);
        }
        if normalize_url(api_url).is_some() || normalize_url(player_url).is_some() {
            tracing::warn!(
                website_id = %settings.website_id,
                "ignoring replay URL overrides: deployment is not self-hosted"
            );
        }
        settings
    }

    /// Vendor API base URL, without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Session player base URL, without a trailing slash.
    #[must_use]
    pub fn player_url(&self) -> &str {
        &self.player_url
    }
}

fn normalize_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
