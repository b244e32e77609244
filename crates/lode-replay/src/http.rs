//! Shared HTTP response helpers for the vendor client.

use crate::error::ReplayError;

/// Return the response unchanged on success, otherwise
/// [`ReplayError::Api`] with the status code and response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ReplayError> {
    if !resp.status().is_success() {
        return Err(ReplayError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Map a `validate_api_access` response status onto the vendor error it signals.
pub async fn classify_validation(resp: reqwest::Response) -> Result<(), ReplayError> {
    match resp.status().as_u16() {
        401 => Err(ReplayError::Unauthorized),
        400 => Err(ReplayError::InvalidWebsiteId),
        404 => Err(ReplayError::InvalidApiUrl),
        _ => check_response(resp).await.map(drop),
    }
}

/// Transport failures that mean the API URL itself is wrong.
pub fn is_bad_url(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_builder()
}
