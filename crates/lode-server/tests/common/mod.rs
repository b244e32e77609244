#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use lode_config::ReplayConfig;
use lode_core::providers::LoginProviders;
use lode_db::LodeService;
use lode_replay::SessionReplayPlugin;
use lode_server::{AppState, router};
use serde_json::Value;
use tower::ServiceExt;

pub async fn service() -> LodeService {
    LodeService::new_local(":memory:", LoginProviders::default())
        .await
        .unwrap()
}

pub fn app(identities: LodeService, replay: ReplayConfig) -> Router {
    router(AppState::new(
        identities,
        SessionReplayPlugin::from_config(replay),
    ))
}

/// Send one request and return its status and JSON body (`Null` when empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
