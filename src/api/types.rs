//! Wire types for the generation proxy.

use crate::provider::ProviderError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;
pub const DEFAULT_STEPS: u32 = 3;

/// Accepted range for both width and height, in pixels.
pub const DIMENSION_RANGE: RangeInclusive<u32> = 512..=1024;

/// Accepted range for the number of sampling steps.
pub const STEPS_RANGE: RangeInclusive<u32> = 1..=4;

/// Incoming `POST /api/generateImages` body.
///
/// Everything is optional at this layer so that missing fields surface as a
/// [`ValidationError`] naming the field instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterative_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<i64>,
}

/// A request field that is missing or out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for '{field}': {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl GenerationRequest {
    /// Check every field against its bounds and fill in defaults.
    pub fn validate(self) -> Result<ImageConfig, ValidationError> {
        let prompt = self
            .prompt
            .ok_or_else(|| ValidationError::new("prompt", "field is required"))?;
        if prompt.trim().is_empty() {
            return Err(ValidationError::new("prompt", "must not be blank"));
        }

        let iterative_mode = self
            .iterative_mode
            .ok_or_else(|| ValidationError::new("iterativeMode", "field is required"))?;

        let width = bounded("width", self.width, DEFAULT_WIDTH, &DIMENSION_RANGE)?;
        let height = bounded("height", self.height, DEFAULT_HEIGHT, &DIMENSION_RANGE)?;
        let steps = bounded("steps", self.steps, DEFAULT_STEPS, &STEPS_RANGE)?;

        Ok(ImageConfig {
            prompt,
            settings: ImageSettings {
                width,
                height,
                steps,
                iterative_mode,
            },
        })
    }
}

fn bounded(
    field: &'static str,
    value: Option<i64>,
    default: u32,
    range: &RangeInclusive<u32>,
) -> Result<u32, ValidationError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match u32::try_from(value) {
        Ok(v) if range.contains(&v) => Ok(v),
        _ => Err(ValidationError::new(
            field,
            format!(
                "{} is out of range ({}..={})",
                value,
                range.start(),
                range.end()
            ),
        )),
    }
}

/// Image parameters shared by a request and the history entry it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub iterative_mode: bool,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            steps: DEFAULT_STEPS,
            iterative_mode: false,
        }
    }
}

/// A fully specified generation request.
///
/// Serializes to the same JSON shape as [`GenerationRequest`] with every field present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ImageConfig {
    pub prompt: String,
    #[serde(flatten)]
    pub settings: ImageSettings,
}

/// Per-image timings reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Timings {
    /// Inference time in seconds as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One generated image as returned by the provider and relayed by the proxy.
///
/// Unknown fields are kept so the object round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImageObject {
    pub b64_json: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<Timings>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ImageObject {
    /// Provider-reported inference time, when present.
    pub fn inference_secs(&self) -> Option<f64> {
        self.timings.as_ref().and_then(|t| t.inference)
    }
}

/// Error body returned by the proxy: `{"error": "...", "param": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    /// Create a bad request error (400).
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: message.to_string(),
            param: None,
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// Create a validation error (400) naming the offending field.
    pub fn validation(err: &ValidationError) -> Self {
        Self {
            error: err.to_string(),
            param: Some(err.field.to_string()),
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// Create a provider failure (500) carrying the provider's description.
    pub fn provider(err: &ProviderError) -> Self {
        Self {
            error: err.to_string(),
            param: None,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(&rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
