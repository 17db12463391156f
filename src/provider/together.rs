//! Together AI image provider.

use super::{ImageCreateParams, ImageProvider, ProviderError};
use crate::api::types::ImageObject;
use crate::config::ProviderConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Together AI implementation of [`ImageProvider`].
///
/// Calls `POST {base_url}/v1/images/generations` with Bearer authentication.
pub struct TogetherProvider {
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
    client: Arc<Client>,
}

/// `/v1/images/generations` response format
#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageObject>,
}

impl TogetherProvider {
    pub fn new(base_url: String, api_key: Option<String>, client: Arc<Client>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs: 60,
            client,
        }
    }

    /// Build a provider from configuration, resolving the API key from the environment.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        let api_key = config.api_key();
        if api_key.is_none() {
            tracing::warn!(
                env = %config.api_key_env,
                "No provider API key found, requests will be sent unauthenticated"
            );
        }

        Ok(Self::new(config.base_url.clone(), api_key, Arc::new(client))
            .with_timeout(config.timeout_seconds))
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/images/generations", self.base_url)
    }
}

/// Pull a readable message out of a provider error body.
///
/// Understands `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"message": ...}`; anything else is returned as-is.
fn upstream_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let message = value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str());

    match message {
        Some(m) => m.to_string(),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl ImageProvider for TogetherProvider {
    fn name(&self) -> &str {
        "together"
    }

    async fn create_image(
        &self,
        params: &ImageCreateParams,
    ) -> Result<Vec<ImageObject>, ProviderError> {
        let mut request = self.client.post(self.endpoint()).json(params);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let images: ImagesResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse images response: {}", e))
        })?;

        tracing::debug!(count = images.data.len(), "Provider returned images");
        Ok(images.data)
    }
}
