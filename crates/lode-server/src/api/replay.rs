//! Session-replay plugin endpoints.

use axum::{
    extract::{Path, State},
    response::Json,
};
use lode_config::ProjectReplayConfig;
use serde::Serialize;
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// `POST /plugins/session-replay/validate`
///
/// Checks plugin settings against the vendor API before they are saved.
pub async fn validate_config(
    State(state): State<AppState>,
    Json(config): Json<ProjectReplayConfig>,
) -> Result<Json<ValidateResponse>, ApiError> {
    state.replay.validate_config(&config).await?;
    Ok(Json(ValidateResponse { valid: true }))
}

/// `POST /projects/{project_id}/events/preprocess`
///
/// Returns the event with a session-replay link attached when the project
/// enables the plugin, otherwise the event unchanged.
pub async fn preprocess_event(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(event): Json<Value>,
) -> Json<Value> {
    Json(state.replay.preprocess_event(&project_id, event).await)
}
