//! # lode-config
//!
//! Layered configuration loading for Lodestar using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LODESTAR_*` prefix, `__` as separator)
//! 2. An explicit config file passed on the command line
//! 3. Project-level `.lodestar/config.toml`
//! 4. User-level `~/.config/lodestar/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LODESTAR_DATABASE__PATH` -> `database.path`,
//! `LODESTAR_REPLAY__PROJECTS__42__API_TOKEN` -> `replay.projects.42.api_token`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use lode_config::LodeConfig;
//!
//! let config = LodeConfig::load_with_dotenv(None).expect("config");
//! println!("listening on {}", config.server.bind_address);
//! ```

mod database;
mod error;
mod identity;
mod replay;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use identity::IdentityConfig;
pub use replay::{ProjectReplayConfig, ReplayConfig};
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "LODESTAR_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LodeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl LodeConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(explicit).extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".lodestar/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file from the command line
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind_address".into(),
                reason: format!("'{}' is not a socket address", self.server.bind_address),
            });
        }
        if self.database.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.replay.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "replay.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lodestar").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or the current dir
    /// looking for a `.env` file. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
