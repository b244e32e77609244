//! The session-replay plugin: configuration validation and event enrichment.

use std::sync::Arc;
use std::time::Duration;

use lode_config::{ProjectReplayConfig, ReplayConfig};
use serde_json::Value;
use thiserror::Error;

use crate::client::ReplayClient;
use crate::context::{CONTEXT_TYPE, primary_context, primary_context_key, session_id, timestamp};
use crate::error::ReplayError;
use crate::settings::ReplaySettings;

pub const UNAUTHORIZED_ERROR: &str = "Unauthorized: either the combination of your account email and access token is invalid or you do not have access";
pub const INVALID_API_URL_ERROR: &str = "The provided API URL is invalid";
pub const INVALID_WEBSITE_ID_ERROR: &str = "The provided website ID is invalid";
pub const UNEXPECTED_ERROR: &str = "Unexpected error occurred. Please try again.";

/// Configuration rejected by the vendor. Messages are shown to users verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("{}", UNAUTHORIZED_ERROR)]
    Unauthorized,
    #[error("{}", INVALID_API_URL_ERROR)]
    InvalidApiUrl,
    #[error("{}", INVALID_WEBSITE_ID_ERROR)]
    InvalidWebsiteId,
    #[error("{}", UNEXPECTED_ERROR)]
    Unexpected,
}

impl From<ReplayError> for PluginError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::Unauthorized => Self::Unauthorized,
            ReplayError::InvalidApiUrl => Self::InvalidApiUrl,
            ReplayError::InvalidWebsiteId => Self::InvalidWebsiteId,
            other => {
                tracing::warn!(error = %other, "replay config validation failed");
                Self::Unexpected
            }
        }
    }
}

/// Source of per-project vendor settings.
pub trait ProjectSettings: Send + Sync {
    /// Settings for `project_id`, or `None` if the plugin is not enabled there.
    fn replay_settings(&self, project_id: &str) -> Option<ReplaySettings>;
}

/// Project settings read from the `[replay]` configuration section.
pub struct ConfiguredProjects {
    config: ReplayConfig,
}

impl ConfiguredProjects {
    #[must_use]
    pub const fn new(config: ReplayConfig) -> Self {
        Self { config }
    }
}

impl ProjectSettings for ConfiguredProjects {
    fn replay_settings(&self, project_id: &str) -> Option<ReplaySettings> {
        self.config
            .project(project_id)
            .map(|p| ReplaySettings::from_project(p, self.config.self_hosted))
    }
}

/// A pending enrichment of one event.
pub struct EventPreprocessor {
    client: ReplayClient,
    context_key: String,
    session_id: String,
    timestamp: Option<i64>,
}

impl EventPreprocessor {
    /// Fetch the session URL and write it into the event's replay context.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the vendor call fails. `event` is dropped
    /// in that case; callers that need pass-through keep their own copy.
    pub async fn apply(&self, mut event: Value) -> Result<Value, ReplayError> {
        let url = self
            .client
            .get_session_url(&self.session_id, self.timestamp)
            .await?;

        let Some(contexts) = event.get_mut("contexts").and_then(Value::as_object_mut) else {
            return Ok(event);
        };
        let Some(mut context) = contexts
            .get(&self.context_key)
            .and_then(Value::as_object)
            .cloned()
        else {
            return Ok(event);
        };

        context.insert("session_url".into(), Value::String(url));
        let context = Value::Object(context);
        if self.context_key != CONTEXT_TYPE {
            contexts.insert(self.context_key.clone(), context.clone());
        }
        contexts.insert(CONTEXT_TYPE.to_string(), context);
        Ok(event)
    }
}

/// Attaches session-replay links to events of projects that enable it.
pub struct SessionReplayPlugin {
    projects: Arc<dyn ProjectSettings>,
    self_hosted: bool,
    timeout: Duration,
}

impl SessionReplayPlugin {
    #[must_use]
    pub fn new(projects: Arc<dyn ProjectSettings>, self_hosted: bool, timeout: Duration) -> Self {
        Self {
            projects,
            self_hosted,
            timeout,
        }
    }

    /// Plugin backed by the `[replay]` configuration section.
    #[must_use]
    pub fn from_config(config: ReplayConfig) -> Self {
        let self_hosted = config.self_hosted;
        let timeout = Duration::from_secs(config.timeout_secs);
        Self::new(
            Arc::new(ConfiguredProjects::new(config)),
            self_hosted,
            timeout,
        )
    }

    /// Call the vendor API once with `config` and map any failure to a fixed
    /// user-facing message.
    ///
    /// # Errors
    ///
    /// Returns the [`PluginError`] matching the vendor's answer, or
    /// [`PluginError::Unexpected`] for anything unclassified.
    pub async fn validate_config(&self, config: &ProjectReplayConfig) -> Result<(), PluginError> {
        let settings = ReplaySettings::from_project(config, self.self_hosted);
        let client = ReplayClient::new(settings, self.timeout)?;
        client.validate_api_access().await?;
        Ok(())
    }

    /// Build the enrichment step for `event`, or `None` when there is nothing
    /// to do: no replay context, no session id, or the project has the
    /// plugin disabled.
    #[must_use]
    pub fn event_preprocessor(&self, project_id: &str, event: &Value) -> Option<EventPreprocessor> {
        let context_key = primary_context_key(event)?;
        let context = primary_context(event)?;
        let session_id = session_id(context)?;
        let settings = self.projects.replay_settings(project_id)?;

        let client = match ReplayClient::new(settings, self.timeout) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(project_id, error = %e, "cannot build replay client");
                return None;
            }
        };

        Some(EventPreprocessor {
            client,
            context_key,
            session_id,
            timestamp: timestamp(context),
        })
    }

    /// Enrich `event` with a session URL when possible.
    ///
    /// Never fails: vendor errors are logged and the event is returned
    /// unchanged.
    pub async fn preprocess_event(&self, project_id: &str, event: Value) -> Value {
        let Some(preprocessor) = self.event_preprocessor(project_id, &event) else {
            return event;
        };

        match preprocessor.apply(event.clone()).await {
            Ok(enriched) => {
                tracing::debug!(project_id, session_id = %preprocessor.session_id, "attached replay URL");
                enriched
            }
            Err(e) => {
                tracing::warn!(
                    project_id,
                    session_id = %preprocessor.session_id,
                    error = %e,
                    "replay enrichment failed, passing event through"
                );
                event
            }
        }
    }
}
