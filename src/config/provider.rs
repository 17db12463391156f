//! Image provider configuration

use serde::{Deserialize, Serialize};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-schnell-Free";

/// Seed sent with every request made in consistency mode.
pub const DEFAULT_CONSISTENCY_SEED: u64 = 123;

/// Settings for the hosted text-to-image provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the provider API (without the `/v1/...` path)
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Model identifier passed on every image request
    pub model: String,
    /// Fixed seed used when a request asks for consistent output
    pub consistency_seed: u64,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.together.xyz".to_string(),
            api_key_env: "TOGETHER_API_KEY".to_string(),
            model: DEFAULT_MODEL.to_string(),
            consistency_seed: DEFAULT_CONSISTENCY_SEED,
            timeout_seconds: 60,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key from the configured environment variable.
    ///
    /// Returns `None` when the variable is unset or empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
