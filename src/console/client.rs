//! Client side of the proxy call.

use crate::api::types::{ImageConfig, ImageObject};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Path of the generation route on the proxy.
pub const GENERATE_PATH: &str = "/api/generateImages";

/// Failure of a single proxy call.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Proxy answered with a non-success status; `body` is the raw response text.
    #[error("{body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { body, .. } => super::notify::user_message(body),
            other => other.to_string(),
        }
    }
}

/// Something that can turn a request into an image.
///
/// The console calls it exactly once per triggered generation and never retries.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &ImageConfig) -> Result<ImageObject, ClientError>;
}

/// [`GenerationClient`] that POSTs to a running proxy.
pub struct HttpGenerationClient {
    endpoint: String,
    timeout_secs: u64,
    http: reqwest::Client,
}

impl HttpGenerationClient {
    pub fn new(proxy_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: format!("{}{}", proxy_url.trim_end_matches('/'), GENERATE_PATH),
            timeout_secs,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, request: &ImageConfig) -> Result<ImageObject, ClientError> {
        tracing::debug!(endpoint = %self.endpoint, "Sending generation request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(self.timeout_secs)
                } else {
                    ClientError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ImageObject>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
