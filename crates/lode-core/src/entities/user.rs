use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Prefix marking a stored password as unusable (set when a user signed up
/// through an external provider and never chose a password).
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// A product user account.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored password hash, if any. Never serialized.
    #[serde(skip)]
    pub password: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Whether the user can log in with a password.
    #[must_use]
    pub fn has_usable_password(&self) -> bool {
        self.password
            .as_deref()
            .is_some_and(|p| !p.is_empty() && !p.starts_with(UNUSABLE_PASSWORD_PREFIX))
    }
}
