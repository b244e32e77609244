//! Session-replay endpoints against a mocked vendor API.

mod common;

use axum::http::StatusCode;
use common::{app, send, service};
use httpmock::prelude::*;
use lode_config::{ProjectReplayConfig, ReplayConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

fn replay_config(server: &MockServer) -> ReplayConfig {
    let mut config = ReplayConfig {
        self_hosted: true,
        ..Default::default()
    };
    config.projects.insert(
        "42".into(),
        ProjectReplayConfig {
            account_email: "ops@example.com".into(),
            api_token: "tok-42".into(),
            website_id: "1337".into(),
            api_url: Some(server.base_url()),
            player_url: Some("https://player.test".into()),
            ..Default::default()
        },
    );
    config
}

fn validate_body(server: &MockServer) -> serde_json::Value {
    json!({
        "account_email": "ops@example.com",
        "api_token": "tok-42",
        "website_id": 1337,
        "api_url": server.base_url()
    })
}

#[tokio::test]
async fn validate_accepts_good_config() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/websites/1337");
            then.status(200).json_body(json!({"id": 1337}));
        })
        .await;
    let app = app(service().await, replay_config(&server));

    let (status, body) = send(&app, "POST", "/plugins/session-replay/validate", Some(validate_body(&server))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"valid": true}));
}

#[tokio::test]
async fn validate_reports_fixed_messages() {
    let cases = [
        (400, "The provided website ID is invalid"),
        (404, "The provided API URL is invalid"),
        (500, "Unexpected error occurred. Please try again."),
    ];
    for (vendor_status, message) in cases {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/websites/1337");
                then.status(vendor_status);
            })
            .await;
        let app = app(service().await, replay_config(&server));

        let (status, body) = send(&app, "POST", "/plugins/session-replay/validate", Some(validate_body(&server))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": {"code": "INVALID_CONFIG", "message": message}})
        );
    }
}

#[tokio::test]
async fn preprocess_attaches_session_url() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/websites/1337/sessions/abc/access_tokens");
            then.status(200).json_body(json!({"access_token": "tkn"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/websites/1337/sessions/abc");
            then.status(200).json_body(json!({"client_start": 1000}));
        })
        .await;
    let app = app(service().await, replay_config(&server));

    let event = json!({"contexts": {"sessionstack": {"session_id": "abc", "timestamp": 11_000}}});
    let (status, body) = send(&app, "POST", "/projects/42/events/preprocess", Some(event)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["contexts"]["sessionstack"]["session_url"],
        "https://player.test/#/sessions/abc?source=sentry&access_token=tkn&pause_at=10000&play_from=5000"
    );
}

#[tokio::test]
async fn preprocess_passes_through_without_context() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200);
        })
        .await;
    let app = app(service().await, replay_config(&server));

    let event = json!({"message": "boom", "tags": {"env": "prod"}});
    let (status, body) = send(&app, "POST", "/projects/42/events/preprocess", Some(event.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, event);
    any.assert_calls_async(0).await;
}
