//! HTTP client for the session-replay vendor API.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::error::ReplayError;
use crate::http::{check_response, classify_validation, is_bad_url};
use crate::settings::ReplaySettings;

/// Name of the access token the client creates for session links.
pub const ACCESS_TOKEN_NAME: &str = "Sentry";

/// How far before the event the player starts, in milliseconds.
pub const MILLISECONDS_BEFORE_EVENT: i64 = 5000;

#[derive(Deserialize)]
struct CreatedToken {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenList {
    #[serde(default)]
    data: Vec<TokenEntry>,
}

#[derive(Deserialize)]
struct TokenEntry {
    name: Option<String>,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct Session {
    client_start: Option<i64>,
}

/// Client for one vendor website.
pub struct ReplayClient {
    http: reqwest::Client,
    settings: ReplaySettings,
}

impl ReplayClient {
    /// Build a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Http`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn new(settings: ReplaySettings, timeout: Duration) -> Result<Self, ReplayError> {
        let http = reqwest::Client::builder()
            .user_agent("lodestar/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self { http, settings })
    }

    /// Check that the credentials, API URL and website id are all accepted.
    ///
    /// # Errors
    ///
    /// - [`ReplayError::InvalidApiUrl`] if the API cannot be reached or
    ///   answers 404.
    /// - [`ReplayError::Unauthorized`] on 401.
    /// - [`ReplayError::InvalidWebsiteId`] on 400.
    /// - [`ReplayError::Api`] on any other non-success status.
    pub async fn validate_api_access(&self) -> Result<(), ReplayError> {
        let resp = match self.request(Method::GET, &self.website_path()).send().await {
            Ok(resp) => resp,
            Err(e) if is_bad_url(&e) => {
                tracing::debug!(error = %e, "replay API unreachable");
                return Err(ReplayError::InvalidApiUrl);
            }
            Err(e) => return Err(e.into()),
        };
        classify_validation(resp).await
    }

    /// Build a player link for `session_id`.
    ///
    /// Includes an access token when one can be created or found. When
    /// `event_timestamp` (milliseconds) is given, the link pauses at the
    /// event and starts playing a few seconds earlier.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] on transport failure, or if a timestamp was
    /// given and the session start cannot be read or the offset overflows.
    pub async fn get_session_url(
        &self,
        session_id: &str,
        event_timestamp: Option<i64>,
    ) -> Result<String, ReplayError> {
        let mut query = vec![("source", "sentry".to_string())];

        if let Some(token) = self.get_access_token(session_id).await? {
            query.push(("access_token", token));
        }

        if let Some(timestamp) = event_timestamp {
            let start = self.get_session_start(session_id).await?;
            let pause_at = timestamp
                .checked_sub(start)
                .ok_or_else(|| ReplayError::Parse("event timestamp out of range".into()))?;
            let play_from = pause_at
                .checked_sub(MILLISECONDS_BEFORE_EVENT)
                .ok_or_else(|| ReplayError::Parse("event timestamp out of range".into()))?;
            query.push(("pause_at", pause_at.to_string()));
            query.push(("play_from", play_from.to_string()));
        }

        let query = query
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!(
            "{}/#/sessions/{}?{query}",
            self.settings.player_url(),
            urlencoding::encode(session_id)
        ))
    }

    async fn get_access_token(&self, session_id: &str) -> Result<Option<String>, ReplayError> {
        if let Some(token) = self.create_access_token(session_id).await? {
            return Ok(Some(token));
        }
        self.find_access_token(session_id).await
    }

    async fn create_access_token(&self, session_id: &str) -> Result<Option<String>, ReplayError> {
        let resp = self
            .request(Method::POST, &self.access_tokens_path(session_id))
            .json(&serde_json::json!({ "name": ACCESS_TOKEN_NAME }))
            .send()
            .await?;
        if resp.status() != reqwest::StatusCode::OK {
            tracing::debug!(status = %resp.status(), "replay access token not created");
            return Ok(None);
        }
        let created: CreatedToken = resp.json().await?;
        Ok(created.access_token)
    }

    async fn find_access_token(&self, session_id: &str) -> Result<Option<String>, ReplayError> {
        let resp = self
            .request(Method::GET, &self.access_tokens_path(session_id))
            .send()
            .await?;
        if resp.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }
        let list: TokenList = resp.json().await?;
        Ok(list
            .data
            .into_iter()
            .find(|t| t.name.as_deref() == Some(ACCESS_TOKEN_NAME))
            .and_then(|t| t.access_token))
    }

    async fn get_session_start(&self, session_id: &str) -> Result<i64, ReplayError> {
        let resp = self
            .request(Method::GET, &self.session_path(session_id))
            .send()
            .await?;
        let session: Session = check_response(resp).await?.json().await?;
        session
            .client_start
            .ok_or_else(|| ReplayError::Parse("session has no client_start".into()))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.settings.api_url()))
            .basic_auth(
                &self.settings.account_email,
                Some(self.settings.api_token.expose_secret()),
            )
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    fn website_path(&self) -> String {
        format!(
            "/v1/websites/{}",
            urlencoding::encode(&self.settings.website_id)
        )
    }

    fn session_path(&self, session_id: &str) -> String {
        format!(
            "{}/sessions/{}",
            self.website_path(),
            urlencoding::encode(session_id)
        )
    }

    fn access_tokens_path(&self, session_id: &str) -> String {
        format!("{}/access_tokens", self.session_path(session_id))
    }
}
