//! Error types for provider calls.

use thiserror::Error;

/// Errors that can occur while calling the image provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// Provider returned an error response (4xx, 5xx).
    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider client could not be constructed.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
