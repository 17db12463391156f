//! Configuration module for FluxTogether
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FLUX_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use fluxtogether::config::FluxConfig;
//!
//! let config = FluxConfig::default();
//! assert_eq!(config.server.port, 3000);
//!
//! let toml = r#"
//! [provider]
//! model = "black-forest-labs/FLUX.1-schnell"
//! "#;
//! let config: FluxConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.provider.model, "black-forest-labs/FLUX.1-schnell");
//! ```

pub mod console;
pub mod error;
pub mod logging;
pub mod provider;
pub mod server;

pub use console::ConsoleConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use provider::ProviderConfig;
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration shared by the proxy server and the console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FluxConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub console: ConsoleConfig,
    pub logging: LoggingConfig,
}

impl FluxConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.message().to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Load the file when it exists, fall back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(Some(path))
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply `FLUX_*` environment variable overrides.
    ///
    /// Values that fail to parse are ignored and the current value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("FLUX_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("FLUX_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("FLUX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLUX_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(model) = std::env::var("FLUX_MODEL") {
            self.provider.model = model;
        }
        if let Ok(url) = std::env::var("FLUX_PROVIDER_URL") {
            self.provider.base_url = url;
        }
        if let Ok(url) = std::env::var("FLUX_PROXY_URL") {
            self.console.proxy_url = url;
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port",
                message: "port must be non-zero".to_string(),
            });
        }

        let required = [
            ("provider.base_url", &self.provider.base_url),
            ("provider.model", &self.provider.model),
            ("provider.api_key_env", &self.provider.api_key_env),
            ("console.proxy_url", &self.console.proxy_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field,
                    message: "cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_flux_config_defaults() {
        let config = FluxConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.provider.consistency_seed, 123);
        assert_eq!(config.console.proxy_url, "http://127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [server]
        port = 9000
        "#;

        let config: FluxConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.provider.timeout_seconds, 60);
    }

    #[test]
    fn test_config_parse_example_file() {
        let toml = include_str!("../../fluxtogether.example.toml");
        let config: FluxConfig = toml::from_str(toml).unwrap();
        assert!(config.server.port > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[provider]\nconsistency_seed = 7").unwrap();

        let config = FluxConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.provider.consistency_seed, 7);
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = FluxConfig::load(Some(Path::new("/nonexistent/fluxtogether.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_or_default_missing_file() {
        let config = FluxConfig::load_or_default(Path::new("/nonexistent/fluxtogether.toml"))
            .unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_config_parse_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server\nport = ").unwrap();

        let result = FluxConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_env_overrides() {
        std::env::set_var("FLUX_PORT", "9999");
        std::env::set_var("FLUX_MODEL", "custom/model");
        std::env::set_var("FLUX_PROXY_URL", "http://proxy:1234");
        let config = FluxConfig::default().with_env_overrides();
        std::env::remove_var("FLUX_PORT");
        std::env::remove_var("FLUX_MODEL");
        std::env::remove_var("FLUX_PROXY_URL");

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.provider.model, "custom/model");
        assert_eq!(config.console.proxy_url, "http://proxy:1234");
    }

    #[test]
    fn test_config_env_invalid_log_format_ignored() {
        std::env::set_var("FLUX_LOG_FORMAT", "xml");
        let config = FluxConfig::default().with_env_overrides();
        std::env::remove_var("FLUX_LOG_FORMAT");

        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_validation_zero_port() {
        let mut config = FluxConfig::default();
        config.server.port = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { field: "server.port", .. })
        ));
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = FluxConfig::default();
        config.provider.model = "  ".to_string();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { field: "provider.model", .. })
        ));
    }
}
