//! Shared test utilities for FluxTogether integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use fluxtogether::api::{create_router, AppState};
use fluxtogether::config::FluxConfig;
use fluxtogether::provider::TogetherProvider;
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-together-key";

/// A one-pixel PNG, base64 encoded.
pub const PIXEL_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// Build a proxy router whose provider points at `mock_server`.
pub fn make_app_with_mock(mock_server: &MockServer) -> Router {
    let config = Arc::new(FluxConfig::default());
    let provider = TogetherProvider::new(
        mock_server.uri(),
        Some(TEST_API_KEY.to_string()),
        Arc::new(reqwest::Client::new()),
    );
    create_router(Arc::new(AppState::with_provider(config, Arc::new(provider))))
}

/// Provider success body carrying a single image.
pub fn provider_image_body() -> serde_json::Value {
    serde_json::json!({
        "id": "gen-123",
        "model": "black-forest-labs/FLUX.1-schnell-Free",
        "object": "list",
        "data": [
            {
                "index": 0,
                "b64_json": PIXEL_PNG_B64,
                "timings": { "inference": 0.42 }
            }
        ]
    })
}

/// Build a JSON `POST /api/generateImages` request.
pub fn generate_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generateImages")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
