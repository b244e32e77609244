//! Error types for the domain layer.
//!
//! Storage and HTTP errors live in their own crates; this enum covers
//! failures that come from the domain types themselves.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// An identity category tag did not match any known category.
    #[error("Unknown identity category: {0}")]
    UnknownCategory(String),
}
