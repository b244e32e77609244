//! Shared handler state.

use std::sync::Arc;

use anyhow::Context;
use lode_config::LodeConfig;
use lode_core::providers::LoginProviders;
use lode_db::LodeService;
use lode_replay::SessionReplayPlugin;

#[derive(Clone)]
pub struct AppState {
    pub identities: Arc<LodeService>,
    pub replay: Arc<SessionReplayPlugin>,
}

impl AppState {
    #[must_use]
    pub fn new(identities: LodeService, replay: SessionReplayPlugin) -> Self {
        Self {
            identities: Arc::new(identities),
            replay: Arc::new(replay),
        }
    }

    /// Open the database and build the replay plugin from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn from_config(config: &LodeConfig) -> anyhow::Result<Self> {
        let login = LoginProviders::new(config.identity.login_providers.clone());
        let identities = LodeService::new_local(&config.database.path, login)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let replay = SessionReplayPlugin::from_config(config.replay.clone());
        Ok(Self::new(identities, replay))
    }
}
