//! Image generation endpoint handler.

use crate::api::{ApiError, AppState, GenerationRequest, ImageObject};
use crate::logging::{generate_request_id, truncate_prompt};
use crate::provider::{ImageCreateParams, ProviderError};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// POST /api/generateImages - Generate one image for a prompt.
///
/// The request is validated before the provider is contacted. The first image
/// the provider returns is relayed unchanged.
#[instrument(skip_all, fields(request_id = %generate_request_id()))]
pub async fn handle(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<ImageObject>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed generation request");
        ApiError::from(rejection)
    })?;

    let config = request.validate().map_err(|e| {
        warn!(field = e.field, error = %e.message, "Rejected invalid generation request");
        ApiError::validation(&e)
    })?;

    let params = ImageCreateParams::for_request(&config, &state.config.provider);
    info!(
        provider = state.provider.name(),
        model = %params.model,
        width = params.width,
        height = params.height,
        steps = params.steps,
        seeded = params.seed.is_some(),
        prompt = ?truncate_prompt(&config.prompt, state.config.logging.enable_content_logging),
        "Image generation request"
    );

    let start = Instant::now();
    let images = state.provider.create_image(&params).await.map_err(|e| {
        error!(error = %e, duration_ms = start.elapsed().as_millis() as u64, "Provider call failed");
        ApiError::provider(&e)
    })?;

    let Some(image) = images.into_iter().next() else {
        let e = ProviderError::InvalidResponse("provider returned no images".to_string());
        error!(error = %e, "Provider call failed");
        return Err(ApiError::provider(&e));
    };

    info!(
        duration_ms = start.elapsed().as_millis() as u64,
        inference = ?image.inference_secs(),
        "Image generated"
    );

    Ok(Json(image))
}
