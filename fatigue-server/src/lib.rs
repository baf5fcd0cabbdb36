//! fatigue-server library - astronaut fatigue assessment service
//!
//! Exposes the router and state for the binary and integration tests.

use axum::Router;
use chrono::{DateTime, Utc};
use fatigue_common::config::ServerConfig;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod scorer;

pub use crate::error::{ApiError, ApiResult};
pub use crate::scorer::{build_scorer, FatigueScorer, ScorerError};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Scorer selected at startup
    pub scorer: Arc<dyn FatigueScorer>,
    /// Add permissive CORS headers
    pub cors: bool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create state with CORS enabled
    pub fn new(scorer: Arc<dyn FatigueScorer>) -> Self {
        Self {
            scorer,
            cors: true,
            startup_time: Utc::now(),
        }
    }

    /// Create state from the resolved startup configuration
    pub fn from_config(config: &ServerConfig, scorer: Arc<dyn FatigueScorer>) -> Self {
        Self {
            cors: config.cors,
            ..Self::new(scorer)
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let cors = state.cors;

    let router = Router::new()
        .merge(api::fatigue_routes())
        .merge(api::health_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
