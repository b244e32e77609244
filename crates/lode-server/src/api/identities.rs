//! User identity listing, lookup, and disconnect.
//!
//! Malformed path segments (non-numeric ids, unknown categories) answer 404
//! like a missing record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use lode_core::{IdentityCategory, UserIdentityConfig};

use crate::{error::ApiError, state::AppState};

fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("{what} '{raw}' does not exist")))
}

fn parse_target(
    category: &str,
    identity_id: &str,
) -> Result<(IdentityCategory, i64), ApiError> {
    let category = category
        .parse::<IdentityCategory>()
        .map_err(|e| ApiError::NotFound(e.to_string()))?;
    Ok((category, parse_id(identity_id, "identity")?))
}

/// `GET /users/{user_id}/user-identities/`
pub async fn list_identities(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserIdentityConfig>>, ApiError> {
    let user_id = parse_id(&user_id, "user")?;
    Ok(Json(state.identities.get_identities(user_id).await?))
}

/// `GET /users/{user_id}/user-identities/{category}/{identity_id}/`
pub async fn get_identity(
    State(state): State<AppState>,
    Path((user_id, category, identity_id)): Path<(String, String, String)>,
) -> Result<Json<UserIdentityConfig>, ApiError> {
    let user_id = parse_id(&user_id, "user")?;
    let (category, id) = parse_target(&category, &identity_id)?;
    Ok(Json(
        state.identities.get_identity(user_id, category, id).await?,
    ))
}

/// `DELETE /users/{user_id}/user-identities/{category}/{identity_id}/`
pub async fn disconnect_identity(
    State(state): State<AppState>,
    Path((user_id, category, identity_id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_id(&user_id, "user")?;
    let (category, id) = parse_target(&category, &identity_id)?;
    state
        .identities
        .disconnect_identity(user_id, category, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
