//! Session-replay vendor error types.

use thiserror::Error;

/// Errors returned by [`crate::ReplayClient`].
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The account email and API token were rejected, or the account has no
    /// access to the website.
    #[error("vendor rejected the account credentials")]
    Unauthorized,

    /// The API URL is unreachable, malformed, or not a vendor API.
    #[error("invalid vendor API URL")]
    InvalidApiUrl,

    /// The vendor does not recognise the website id.
    #[error("invalid website id")]
    InvalidWebsiteId,

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Vendor API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the vendor.
        status: u16,
        /// Response body.
        message: String,
    },

    /// A vendor response was missing a field or had the wrong shape.
    #[error("parse error: {0}")]
    Parse(String),
}
