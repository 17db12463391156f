//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or validate a [`FluxConfig`](super::FluxConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// `field` is the dotted TOML path, e.g. `provider.model`.
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: &'static str, message: String },
}
