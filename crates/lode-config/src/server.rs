//! HTTP server configuration.

use serde::{Deserialize, Serialize};

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_localhost() {
        assert_eq!(ServerConfig::default().bind_address, "127.0.0.1:8080");
    }
}
