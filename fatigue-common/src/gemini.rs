//! Gemini prompt construction and reply parsing
//!
//! Pure helpers for the AI-delegated scorer. The HTTP call itself lives in
//! the server crate; everything here is deterministic and unit-tested.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::evaluator::{classify_state, MAX_SCORE};
use crate::telemetry::{Alert, FatigueAssessment, TelemetryReading};

/// Errors raised while turning model text into an assessment
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("Model reply is empty")]
    Empty,

    #[error("Model reply is not valid assessment JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Model reply has a non-numeric fatigueScore")]
    InvalidScore,
}

/// Build the analysis prompt for one reading
pub fn build_prompt(reading: &TelemetryReading) -> String {
    let TelemetryReading {
        hr,
        hrv,
        spo2,
        sleep,
        activity,
    } = *reading;

    format!(
        r#"You are an AI model that monitors astronaut health and specializes in fatigue analysis for the Interactive Space Fatigue program.

Analyze the telemetry below and return a single JSON object.

Input data:
- Heart Rate (HR): {hr} bpm (normal resting 50-80; above 90 indicates stress or exertion)
- Heart Rate Variability (HRV): {hrv} ms (normal 40-80; below 35 indicates high stress or fatigue)
- Blood Oxygen (SpO2): {spo2}% (normal 95-100; below 94 is a concern)
- Sleep Duration: {sleep} hours (optimal 7-9; below 6.5 is insufficient)
- Activity Level: {activity}/10 (subjective score of recent workload intensity)

Rules:
1. fatigueScore: one integer from 0 (optimal) to 100 (critical).
   Low HRV, short sleep and high HR are strong fatigue indicators.
   A high activity level amplifies the other negative indicators.
   Low SpO2 is a critical factor and must raise the score heavily.
2. fatigueState: one string chosen from the score:
   0-20 "Optimal", 21-40 "Low", 41-60 "Moderate", 61-80 "High", 81-100 "Critical".
3. alerts: an array with one object per metric outside its ideal range.
   Each object has "metric" (one of "HR", "HRV", "SpO2", "Sleep", "Activity"),
   "level" ("amber" for caution, "red" for critical) and "message".
   If every vital is optimal, return an empty array.

Respond with the JSON object only. No explanations, no markdown.

Example:
{{"fatigueScore": 68, "fatigueState": "High", "alerts": [{{"metric": "HRV", "level": "red", "message": "HRV is critically low, indicating significant physiological stress or fatigue."}}]}}

Data: HR: {hr}, HRV: {hrv}, SpO2: {spo2}, Sleep: {sleep}, Activity: {activity}
"#
    )
}

/// Remove markdown code-fence wrapping the model sometimes adds
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessment {
    fatigue_score: serde_json::Number,
    fatigue_state: Option<String>,
    #[serde(default)]
    alerts: Vec<Alert>,
}

/// Parse model text into an assessment.
///
/// The score is rounded and clamped to 0..=100 and the state is always
/// recomputed from it, so AI output obeys the same invariants as the
/// rule-based evaluator. The model's own state label is only compared,
/// never trusted, so an unknown label is logged rather than rejected.
pub fn parse_reply(text: &str) -> Result<FatigueAssessment, ReplyError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(ReplyError::Empty);
    }

    let raw: RawAssessment = serde_json::from_str(body)?;
    let score = raw
        .fatigue_score
        .as_f64()
        .filter(|s| s.is_finite())
        .ok_or(ReplyError::InvalidScore)?
        .round()
        .clamp(0.0, f64::from(MAX_SCORE)) as u32;

    let state = classify_state(score);
    if let Some(reported) = raw.fatigue_state.as_deref() {
        if reported != state.as_str() {
            warn!(
                score = score,
                reported = reported,
                derived = %state,
                "Model fatigueState disagrees with score band, using derived state"
            );
        }
    }

    Ok(FatigueAssessment {
        score,
        state,
        alerts: raw.alerts,
    })
}
