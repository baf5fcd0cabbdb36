//! Fatigue calculation endpoint
//!
//! POST /api/calculate_fatigue with `{hr, hrv, spo2, sleep, activity}`.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use fatigue_common::{FatigueAssessment, TelemetryReading};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// POST /api/calculate_fatigue
///
/// The body is validated completely before the scorer is called.
pub async fn calculate_fatigue(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<FatigueAssessment>> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "Rejected non-JSON fatigue request");
        ApiError::BadRequest("Request must be JSON".to_string())
    })?;

    debug!(body = %body, "Received fatigue request");

    let reading = TelemetryReading::from_json(&body).map_err(|e| {
        warn!(error = %e, "Rejected fatigue request");
        ApiError::BadRequest(e.to_string())
    })?;

    debug!(
        hr = reading.hr,
        hrv = reading.hrv,
        spo2 = reading.spo2,
        sleep = reading.sleep,
        activity = reading.activity,
        "Processed telemetry reading"
    );

    let assessment = state.scorer.assess(&reading).await.map_err(|e| {
        error!(scorer = state.scorer.name(), error = %e, "Fatigue scoring failed");
        ApiError::Scoring(e)
    })?;

    Ok(Json(assessment))
}

/// Build fatigue routes
pub fn fatigue_routes() -> Router<AppState> {
    Router::new().route("/api/calculate_fatigue", post(calculate_fatigue))
}
