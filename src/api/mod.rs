//! # Generation Proxy
//!
//! HTTP surface that forwards image generation requests to the configured
//! [`ImageProvider`].
//!
//! ## Endpoints
//!
//! - `POST /api/generateImages` - Validate a request and return the first generated image
//! - `GET /health` - Liveness, uptime and provider details
//!
//! ## Example
//!
//! ```no_run
//! use fluxtogether::api::{create_router, AppState};
//! use fluxtogether::config::FluxConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(FluxConfig::default());
//! let state = Arc::new(AppState::new(config)?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": "<message>"}`. Validation failures are
//! `400` and name the field in `param`; provider failures are `500`.

mod generate;
mod health;
pub mod types;

pub use types::*;

use crate::config::FluxConfig;
use crate::provider::{ImageProvider, ProviderError, TogetherProvider};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

/// Maximum request body size (64 KB). Requests only carry a prompt and a few numbers.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<FluxConfig>,
    pub provider: Arc<dyn ImageProvider>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create application state backed by the Together provider from `config`.
    pub fn new(config: Arc<FluxConfig>) -> Result<Self, ProviderError> {
        let provider = TogetherProvider::from_config(&config.provider)?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Create application state around an existing provider.
    pub fn with_provider(config: Arc<FluxConfig>, provider: Arc<dyn ImageProvider>) -> Self {
        Self {
            config,
            provider,
            start_time: Instant::now(),
        }
    }
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let mut router = Router::new()
        .route("/api/generateImages", post(generate::handle))
        .route("/health", get(health::handle))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http());

    if state.config.server.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
