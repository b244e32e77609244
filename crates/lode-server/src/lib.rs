//! # lode-server
//!
//! axum router exposing the Lodestar identity API and the session-replay
//! plugin endpoints. The `lodestar` binary wires it to configuration.

pub mod api;
pub mod error;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

pub use error::ApiError;
pub use state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health::health_check))
        .route(
            "/users/{user_id}/user-identities/",
            get(api::identities::list_identities),
        )
        .route(
            "/users/{user_id}/user-identities/{category}/{identity_id}/",
            get(api::identities::get_identity).delete(api::identities::disconnect_identity),
        )
        .route(
            "/plugins/session-replay/validate",
            post(api::replay::validate_config),
        )
        .route(
            "/projects/{project_id}/events/preprocess",
            post(api::replay::preprocess_event),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}
