//! Image provider abstraction.
//!
//! The proxy talks to the hosted text-to-image service through the
//! [`ImageProvider`] trait so handlers never depend on a concrete vendor.

use async_trait::async_trait;
use serde::Serialize;

pub mod error;
pub mod together;

pub use error::ProviderError;
pub use together::TogetherProvider;

use crate::api::types::{ImageConfig, ImageObject};
use crate::config::ProviderConfig;

/// Encoding requested for generated images. The proxy only relays inline
/// base64 (`b64_json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Base64,
}

/// Images requested per call; only the first is returned to the caller.
pub const IMAGES_PER_REQUEST: u32 = 1;

/// Parameters of a single image-creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageCreateParams {
    pub model: String,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub response_format: ResponseFormat,
}

impl ImageCreateParams {
    /// Build provider parameters for a validated request.
    ///
    /// Consistency (iterative) mode pins the seed; otherwise the provider
    /// picks its own.
    pub fn for_request(config: &ImageConfig, provider: &ProviderConfig) -> Self {
        let settings = config.settings;
        Self {
            model: provider.model.clone(),
            prompt: config.prompt.clone(),
            width: settings.width,
            height: settings.height,
            steps: settings.steps,
            n: IMAGES_PER_REQUEST,
            seed: settings
                .iterative_mode
                .then_some(provider.consistency_seed),
            response_format: ResponseFormat::Base64,
        }
    }
}

/// A hosted text-to-image service.
///
/// Object-safe; the proxy holds it as `Arc<dyn ImageProvider>`.
#[async_trait]
pub trait ImageProvider: Send + Sync + 'static {
    /// Short name for logs and the health endpoint (e.g. "together").
    fn name(&self) -> &str;

    /// Create images for `params`, returning them in provider order.
    async fn create_image(
        &self,
        params: &ImageCreateParams,
    ) -> Result<Vec<ImageObject>, ProviderError>;
}
