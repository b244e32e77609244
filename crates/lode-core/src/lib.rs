//! # lode-core
//!
//! Core types and rules for Lodestar identity aggregation.
//!
//! This crate has no I/O. It provides:
//! - Entity structs for users and the three identity variants
//! - `IdentityCategory` tags for the three identity tables
//! - Disconnect-status rules as pure functions
//! - The `UserIdentityConfig` wire view and the resolver that builds it
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod providers;
pub mod resolver;
pub mod status;
pub mod view;

pub use enums::{DisconnectStatus, IdentityCategory};
pub use errors::CoreError;
pub use resolver::{IdentitySet, find_identity, resolve_identities};
pub use view::UserIdentityConfig;
