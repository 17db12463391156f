//! Proxy server configuration

use serde::{Deserialize, Serialize};

/// Proxy server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole `/api/generateImages` round trip
    pub request_timeout_seconds: u64,
    /// Allow cross-origin browser clients
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_seconds: 120,
            cors_permissive: true,
        }
    }
}
