//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lode_db::IdentityError;
use lode_replay::PluginError;
use serde::Serialize;

/// Error body: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Session-replay settings rejected by the vendor.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::UserNotFound(_) | IdentityError::NotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            IdentityError::NotDisconnectable { .. } => Self::Forbidden(err.to_string()),
            IdentityError::Database(e) => Self::Internal(e.into()),
        }
    }
}

impl From<PluginError> for ApiError {
    fn from(err: PluginError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            Self::InvalidConfig(msg) => (StatusCode::BAD_REQUEST, "INVALID_CONFIG", msg),
            Self::Internal(err) => {
                tracing::error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetails { code, message },
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_core::{DisconnectStatus, IdentityCategory};

    #[test]
    fn identity_errors_map_to_status() {
        let not_found = ApiError::from(IdentityError::NotFound {
            category: IdentityCategory::OrgIdentity,
            id: 3,
        });
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let forbidden = ApiError::from(IdentityError::NotDisconnectable {
            category: IdentityCategory::GlobalIdentity,
            id: 3,
            status: DisconnectStatus::NeededForGlobalAuth,
        });
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let missing_user = ApiError::from(IdentityError::UserNotFound(9));
        assert_eq!(missing_user.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn plugin_errors_are_bad_requests() {
        let err = ApiError::from(PluginError::InvalidWebsiteId);
        assert!(matches!(err, ApiError::InvalidConfig(ref m) if m == "The provided website ID is invalid"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
