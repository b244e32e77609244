//! # lode-replay
//!
//! Session-replay vendor integration for Lodestar.
//!
//! - [`ReplayClient`] talks to the vendor REST API: it validates credentials
//!   and builds player links for recorded sessions.
//! - [`SessionReplayPlugin`] looks for a `sessionstack` context in incoming
//!   events and, for projects that enable the plugin, writes the session's
//!   player link into it as `session_url`.

pub mod client;
pub mod context;
pub mod plugin;
pub mod settings;

mod error;
mod http;

pub use client::ReplayClient;
pub use error::ReplayError;
pub use plugin::{
    ConfiguredProjects, EventPreprocessor, PluginError, ProjectSettings, SessionReplayPlugin,
};
pub use settings::ReplaySettings;
