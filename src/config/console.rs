//! Console (client) configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings used by the `generate` and `console` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of a running generation proxy
    pub proxy_url: String,
    /// Directory downloaded images are written to
    pub download_dir: PathBuf,
    pub request_timeout_seconds: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:3000".to_string(),
            download_dir: PathBuf::from("."),
            request_timeout_seconds: 120,
        }
    }
}
