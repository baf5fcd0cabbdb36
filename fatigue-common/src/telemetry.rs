//! Telemetry readings and fatigue assessment types
//!
//! Wire format matches the fatigue endpoint:
//! request `{hr, hrv, spo2, sleep, activity}`,
//! response `{fatigueScore, fatigueState, alerts}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Request keys in canonical order
pub const FIELD_NAMES: [&str; 5] = ["hr", "hrv", "spo2", "sleep", "activity"];

/// Upper bounds accepted by [`TelemetryReading::from_json`]
pub const MAX_HR: u32 = 300;
pub const MAX_HRV: u32 = 1000;
pub const MAX_SPO2: u32 = 100;
pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const MAX_ACTIVITY: u32 = 10;

/// One set of astronaut vitals, constructed per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    /// Heart rate (bpm)
    pub hr: u32,
    /// Heart-rate variability (ms)
    pub hrv: u32,
    /// Blood oxygen saturation (%)
    pub spo2: u32,
    /// Sleep duration (hours)
    pub sleep: f64,
    /// Workload intensity (0-10)
    pub activity: u32,
}

/// Why a request body could not become a [`TelemetryReading`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadingError {
    /// Body parsed as JSON but is not an object
    #[error("Request must be a JSON object")]
    NotAnObject,

    /// Required keys absent, in canonical order
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Keys present but values rejected, one entry per field
    #[error("Invalid field values: {}", .0.join("; "))]
    InvalidFields(Vec<String>),
}

impl TelemetryReading {
    /// Build a reading from a decoded JSON body.
    ///
    /// Presence is checked before values, so a body with missing keys always
    /// reports [`ReadingError::MissingFields`]. Values must be JSON numbers;
    /// nothing is coerced to zero.
    pub fn from_json(body: &Value) -> Result<Self, ReadingError> {
        let object = body.as_object().ok_or(ReadingError::NotAnObject)?;

        let missing: Vec<&'static str> = FIELD_NAMES
            .iter()
            .copied()
            .filter(|key| !object.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(ReadingError::MissingFields(missing));
        }

        let mut problems = Vec::new();
        let hr = whole_number(&object["hr"], "hr", MAX_HR, &mut problems);
        let hrv = whole_number(&object["hrv"], "hrv", MAX_HRV, &mut problems);
        let spo2 = whole_number(&object["spo2"], "spo2", MAX_SPO2, &mut problems);
        let sleep = bounded_number(&object["sleep"], "sleep", MAX_SLEEP_HOURS, &mut problems);
        let activity = whole_number(&object["activity"], "activity", MAX_ACTIVITY, &mut problems);

        match (hr, hrv, spo2, sleep, activity) {
            (Some(hr), Some(hrv), Some(spo2), Some(sleep), Some(activity)) if problems.is_empty() => {
                Ok(Self {
                    hr,
                    hrv,
                    spo2,
                    sleep,
                    activity,
                })
            }
            _ => Err(ReadingError::InvalidFields(problems)),
        }
    }
}

fn bounded_number(value: &Value, name: &str, max: f64, problems: &mut Vec<String>) -> Option<f64> {
    let Some(number) = value.as_f64() else {
        problems.push(format!("{} must be a number", name));
        return None;
    };
    if !number.is_finite() || number < 0.0 {
        problems.push(format!("{} must be a non-negative number", name));
        return None;
    }
    if number > max {
        problems.push(format!("{} must not exceed {}", name, max));
        return None;
    }
    Some(number)
}

fn whole_number(value: &Value, name: &str, max: u32, problems: &mut Vec<String>) -> Option<u32> {
    let number = bounded_number(value, name, f64::from(max), problems)?;
    if number.fract() != 0.0 {
        problems.push(format!("{} must be a whole number", name));
        return None;
    }
    Some(number as u32)
}

/// Categorical fatigue state derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatigueState {
    Optimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl FatigueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FatigueState::Optimal => "Optimal",
            FatigueState::Low => "Low",
            FatigueState::Moderate => "Moderate",
            FatigueState::High => "High",
            FatigueState::Critical => "Critical",
        }
    }
}

impl fmt::Display for FatigueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monitored vital sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "HRV")]
    Hrv,
    #[serde(rename = "SpO2", alias = "SpO₂", alias = "SPO2")]
    SpO2,
    Sleep,
    Activity,
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Caution
    #[serde(alias = "Amber")]
    Amber,
    /// Critical
    #[serde(alias = "Red")]
    Red,
}

/// Per-metric threshold breach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub metric: Metric,
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(metric: Metric, level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            metric,
            level,
            message: message.into(),
        }
    }
}

/// Result returned by the fatigue endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueAssessment {
    /// 0 (optimal) to 100 (critical)
    #[serde(rename = "fatigueScore")]
    pub score: u32,
    #[serde(rename = "fatigueState")]
    pub state: FatigueState,
    pub alerts: Vec<Alert>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_accepts_complete_body() {
        let body = json!({"hr": 72, "hrv": 58, "spo2": 98, "sleep": 6.5, "activity": 3});
        let reading = TelemetryReading::from_json(&body).unwrap();

        assert_eq!(reading.hr, 72);
        assert_eq!(reading.hrv, 58);
        assert_eq!(reading.spo2, 98);
        assert_eq!(reading.sleep, 6.5);
        assert_eq!(reading.activity, 3);
    }

    #[test]
    fn test_from_json_accepts_integral_floats() {
        let body = json!({"hr": 72.0, "hrv": 58, "spo2": 98, "sleep": 7, "activity": 0});
        let reading = TelemetryReading::from_json(&body).unwrap();
        assert_eq!(reading.hr, 72);
        assert_eq!(reading.sleep, 7.0);
    }

    #[test]
    fn test_from_json_lists_all_missing_fields_in_order() {
        let body = json!({"hrv": 58, "sleep": 7});
        let err = TelemetryReading::from_json(&body).unwrap_err();

        assert_eq!(err, ReadingError::MissingFields(vec!["hr", "spo2", "activity"]));
        assert_eq!(err.to_string(), "Missing required fields: hr, spo2, activity");
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = TelemetryReading::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, ReadingError::NotAnObject);
    }

    #[test]
    fn test_from_json_rejects_strings_and_null() {
        let body = json!({"hr": "72", "hrv": null, "spo2": 98, "sleep": 7, "activity": 3});
        let err = TelemetryReading::from_json(&body).unwrap_err();

        match err {
            ReadingError::InvalidFields(problems) => {
                assert_eq!(problems.len(), 2);
                assert!(problems[0].starts_with("hr "));
                assert!(problems[1].starts_with("hrv "));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_negative_fractional_and_out_of_range() {
        let body = json!({"hr": -5, "hrv": 40.5, "spo2": 101, "sleep": 25, "activity": 11});
        let err = TelemetryReading::from_json(&body).unwrap_err();

        let ReadingError::InvalidFields(problems) = err else {
            panic!("expected invalid fields");
        };
        assert_eq!(
            problems,
            vec![
                "hr must be a non-negative number",
                "hrv must be a whole number",
                "spo2 must not exceed 100",
                "sleep must not exceed 24",
                "activity must not exceed 10",
            ]
        );
    }

    #[test]
    fn test_reading_error_messages() {
        assert_eq!(ReadingError::NotAnObject.to_string(), "Request must be a JSON object");

        let err = ReadingError::InvalidFields(vec![
            "hr must be a number".to_string(),
            "sleep must not exceed 24".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid field values: hr must be a number; sleep must not exceed 24"
        );
    }

    #[test]
    fn test_assessment_wire_names() {
        let assessment = FatigueAssessment {
            score: 35,
            state: FatigueState::Low,
            alerts: vec![Alert::new(Metric::SpO2, AlertLevel::Amber, "low oxygen")],
        };

        let value = serde_json::to_value(&assessment).unwrap();
        assert_eq!(value["fatigueScore"], 35);
        assert_eq!(value["fatigueState"], "Low");
        assert_eq!(value["alerts"][0]["metric"], "SpO2");
        assert_eq!(value["alerts"][0]["level"], "amber");
        assert_eq!(value["alerts"][0]["message"], "low oxygen");
    }

    #[test]
    fn test_alert_aliases_deserialize() {
        let alert: Alert =
            serde_json::from_str(r#"{"metric": "SpO₂", "level": "Red", "message": "m"}"#).unwrap();
        assert_eq!(alert.metric, Metric::SpO2);
        assert_eq!(alert.level, AlertLevel::Red);
    }
}
