//! Rule-based fatigue evaluation
//!
//! Additive point system over the five vitals, capped at 100:
//!
//! | Metric   | Points                                              |
//! |----------|-----------------------------------------------------|
//! | HR       | 20 outside 50-100 bpm, 10 outside 60-90 bpm          |
//! | HRV      | 25 below 30 ms, 15 below 40 ms, 5 below 50 ms        |
//! | SpO2     | 20 below 94 %, 10 below 96 %                         |
//! | Sleep    | 20 below 5 h, 15 below 6 h, 5 below 7 h              |
//! | Activity | 15 above 8, 10 above 6, 5 above 4                    |
//!
//! Alerts use the two most severe bands of each metric (red, then amber);
//! the mildest scoring band adds points without raising an alert.
//! Activity only raises amber.

use crate::telemetry::{Alert, AlertLevel, FatigueAssessment, FatigueState, Metric, TelemetryReading};

/// Highest possible fatigue score
pub const MAX_SCORE: u32 = 100;

fn hr_points(hr: u32) -> u32 {
    if !(50..=100).contains(&hr) {
        20
    } else if !(60..=90).contains(&hr) {
        10
    } else {
        0
    }
}

fn hrv_points(hrv: u32) -> u32 {
    match hrv {
        0..=29 => 25,
        30..=39 => 15,
        40..=49 => 5,
        _ => 0,
    }
}

fn spo2_points(spo2: u32) -> u32 {
    match spo2 {
        0..=93 => 20,
        94..=95 => 10,
        _ => 0,
    }
}

fn sleep_points(sleep: f64) -> u32 {
    if sleep < 5.0 {
        20
    } else if sleep < 6.0 {
        15
    } else if sleep < 7.0 {
        5
    } else {
        0
    }
}

fn activity_points(activity: u32) -> u32 {
    match activity {
        0..=4 => 0,
        5..=6 => 5,
        7..=8 => 10,
        _ => 15,
    }
}

/// Sum per-metric points, capped at [`MAX_SCORE`]
pub fn compute_score(reading: &TelemetryReading) -> u32 {
    let total = hr_points(reading.hr)
        + hrv_points(reading.hrv)
        + spo2_points(reading.spo2)
        + sleep_points(reading.sleep)
        + activity_points(reading.activity);
    total.min(MAX_SCORE)
}

/// Map a score to its band; boundary values fall into the lower band
pub fn classify_state(score: u32) -> FatigueState {
    match score {
        0..=20 => FatigueState::Optimal,
        21..=40 => FatigueState::Low,
        41..=60 => FatigueState::Moderate,
        61..=80 => FatigueState::High,
        _ => FatigueState::Critical,
    }
}

/// Alerts in fixed order: HR, HRV, SpO2, Sleep, Activity
pub fn generate_alerts(reading: &TelemetryReading) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let hr = reading.hr;
    if !(50..=100).contains(&hr) {
        alerts.push(Alert::new(
            Metric::Hr,
            AlertLevel::Red,
            format!("Heart rate ({} bpm) is outside the safe range (50-100 bpm).", hr),
        ));
    } else if !(60..=90).contains(&hr) {
        alerts.push(Alert::new(
            Metric::Hr,
            AlertLevel::Amber,
            format!("Heart rate ({} bpm) is outside the resting range, indicating stress or exertion.", hr),
        ));
    }

    let hrv = reading.hrv;
    if hrv < 30 {
        alerts.push(Alert::new(
            Metric::Hrv,
            AlertLevel::Red,
            format!("HRV ({} ms) is critically low, indicating significant physiological stress or fatigue.", hrv),
        ));
    } else if hrv < 40 {
        alerts.push(Alert::new(
            Metric::Hrv,
            AlertLevel::Amber,
            format!("HRV ({} ms) is below the optimal range, suggesting increased stress.", hrv),
        ));
    }

    let spo2 = reading.spo2;
    if spo2 < 94 {
        alerts.push(Alert::new(
            Metric::SpO2,
            AlertLevel::Red,
            format!("Blood oxygen ({}%) is critically low and requires immediate attention.", spo2),
        ));
    } else if spo2 < 96 {
        alerts.push(Alert::new(
            Metric::SpO2,
            AlertLevel::Amber,
            format!("Blood oxygen ({}%) is below the optimal range.", spo2),
        ));
    }

    let sleep = reading.sleep;
    if sleep < 5.0 {
        alerts.push(Alert::new(
            Metric::Sleep,
            AlertLevel::Red,
            format!("Sleep duration ({} hrs) is critically insufficient for recovery.", sleep),
        ));
    } else if sleep < 6.0 {
        alerts.push(Alert::new(
            Metric::Sleep,
            AlertLevel::Amber,
            format!("Sleep duration ({} hrs) is below the optimal range, impacting recovery.", sleep),
        ));
    }

    if reading.activity > 8 {
        alerts.push(Alert::new(
            Metric::Activity,
            AlertLevel::Amber,
            format!("High activity level ({}/10) may be contributing to fatigue.", reading.activity),
        ));
    }

    alerts
}

/// Score, classify and alert in one pass
pub fn evaluate(reading: &TelemetryReading) -> FatigueAssessment {
    let score = compute_score(reading);
    FatigueAssessment {
        score,
        state: classify_state(score),
        alerts: generate_alerts(reading),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reading(hr: u32, hrv: u32, spo2: u32, sleep: f64, activity: u32) -> TelemetryReading {
        TelemetryReading {
            hr,
            hrv,
            spo2,
            sleep,
            activity,
        }
    }

    fn ideal() -> TelemetryReading {
        reading(72, 60, 98, 8.0, 2)
    }

    #[test]
    fn test_ideal_reading_is_optimal_without_alerts() {
        let assessment = evaluate(&ideal());
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.state, FatigueState::Optimal);
        assert!(assessment.alerts.is_empty());
    }

    #[test]
    fn test_worst_case_reading() {
        let assessment = evaluate(&reading(45, 25, 92, 4.0, 9));

        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.state, FatigueState::Critical);

        let summary: Vec<(Metric, AlertLevel)> = assessment
            .alerts
            .iter()
            .map(|a| (a.metric, a.level))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Metric::Hr, AlertLevel::Red),
                (Metric::Hrv, AlertLevel::Red),
                (Metric::SpO2, AlertLevel::Red),
                (Metric::Sleep, AlertLevel::Red),
                (Metric::Activity, AlertLevel::Amber),
            ]
        );
    }

    #[test]
    fn test_hr_band_edges() {
        assert_eq!(hr_points(49), 20);
        assert_eq!(hr_points(50), 10);
        assert_eq!(hr_points(59), 10);
        assert_eq!(hr_points(60), 0);
        assert_eq!(hr_points(90), 0);
        assert_eq!(hr_points(91), 10);
        assert_eq!(hr_points(100), 10);
        assert_eq!(hr_points(101), 20);
    }

    #[test]
    fn test_hrv_band_edges() {
        assert_eq!(hrv_points(29), 25);
        assert_eq!(hrv_points(30), 15);
        assert_eq!(hrv_points(39), 15);
        assert_eq!(hrv_points(40), 5);
        assert_eq!(hrv_points(49), 5);
        assert_eq!(hrv_points(50), 0);
    }

    #[test]
    fn test_spo2_sleep_activity_band_edges() {
        assert_eq!(spo2_points(93), 20);
        assert_eq!(spo2_points(94), 10);
        assert_eq!(spo2_points(95), 10);
        assert_eq!(spo2_points(96), 0);

        assert_eq!(sleep_points(4.9), 20);
        assert_eq!(sleep_points(5.0), 15);
        assert_eq!(sleep_points(5.9), 15);
        assert_eq!(sleep_points(6.0), 5);
        assert_eq!(sleep_points(6.9), 5);
        assert_eq!(sleep_points(7.0), 0);

        assert_eq!(activity_points(4), 0);
        assert_eq!(activity_points(5), 5);
        assert_eq!(activity_points(6), 5);
        assert_eq!(activity_points(7), 10);
        assert_eq!(activity_points(8), 10);
        assert_eq!(activity_points(9), 15);
    }

    #[test]
    fn test_classify_state_boundaries() {
        assert_eq!(classify_state(0), FatigueState::Optimal);
        assert_eq!(classify_state(20), FatigueState::Optimal);
        assert_eq!(classify_state(21), FatigueState::Low);
        assert_eq!(classify_state(40), FatigueState::Low);
        assert_eq!(classify_state(41), FatigueState::Moderate);
        assert_eq!(classify_state(60), FatigueState::Moderate);
        assert_eq!(classify_state(61), FatigueState::High);
        assert_eq!(classify_state(80), FatigueState::High);
        assert_eq!(classify_state(81), FatigueState::Critical);
        assert_eq!(classify_state(100), FatigueState::Critical);
    }

    #[test]
    fn test_amber_alerts() {
        let alerts = generate_alerts(&reading(95, 35, 95, 5.5, 7));
        let summary: Vec<(Metric, AlertLevel)> = alerts.iter().map(|a| (a.metric, a.level)).collect();
        assert_eq!(
            summary,
            vec![
                (Metric::Hr, AlertLevel::Amber),
                (Metric::Hrv, AlertLevel::Amber),
                (Metric::SpO2, AlertLevel::Amber),
                (Metric::Sleep, AlertLevel::Amber),
            ]
        );
        assert!(alerts[0].message.contains("95 bpm"));
        assert!(alerts[3].message.contains("5.5 hrs"));
    }

    #[test]
    fn test_mild_band_scores_without_alert() {
        let assessment = evaluate(&reading(72, 45, 98, 6.5, 5));
        assert_eq!(assessment.score, 15);
        assert_eq!(assessment.state, FatigueState::Optimal);
        assert!(assessment.alerts.is_empty());
    }

    #[test]
    fn test_moderate_example() {
        // 10 (HR 95) + 15 (HRV 35) + 0 + 5 (sleep 6.5) + 10 (activity 7)
        let assessment = evaluate(&reading(95, 35, 97, 6.5, 7));
        assert_eq!(assessment.score, 40);
        assert_eq!(assessment.state, FatigueState::Low);
        assert_eq!(assessment.alerts.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_normal_band_is_zero(
            hr in 60u32..=90,
            hrv in 50u32..=1000,
            spo2 in 96u32..=100,
            sleep in 7.0f64..=24.0,
            activity in 0u32..=4,
        ) {
            let assessment = evaluate(&reading(hr, hrv, spo2, sleep, activity));
            prop_assert_eq!(assessment.score, 0);
            prop_assert_eq!(assessment.state, FatigueState::Optimal);
            prop_assert!(assessment.alerts.is_empty());
        }

        #[test]
        fn prop_score_in_range_and_state_consistent(
            hr in 0u32..=300,
            hrv in 0u32..=1000,
            spo2 in 0u32..=100,
            sleep in 0.0f64..=24.0,
            activity in 0u32..=10,
        ) {
            let assessment = evaluate(&reading(hr, hrv, spo2, sleep, activity));
            prop_assert!(assessment.score <= MAX_SCORE);
            prop_assert_eq!(assessment.state, classify_state(assessment.score));
        }

        #[test]
        fn prop_monotonic_as_metrics_worsen(
            base_hr in 60u32..=90,
            hrv in 0u32..=200,
            spo2 in 0u32..=100,
            sleep in 0.0f64..=12.0,
            activity in 0u32..=10,
            delta in 0u32..=100,
        ) {
            let base = reading(base_hr, hrv, spo2, sleep, activity);
            let score = compute_score(&base);

            let hr_up = reading(base_hr + delta, hrv, spo2, sleep, activity);
            let hr_down = reading(base_hr.saturating_sub(delta), hrv, spo2, sleep, activity);
            prop_assert!(compute_score(&hr_up) >= score);
            prop_assert!(compute_score(&hr_down) >= score);

            let hrv_down = reading(base_hr, hrv.saturating_sub(delta), spo2, sleep, activity);
            prop_assert!(compute_score(&hrv_down) >= score);

            let spo2_down = reading(base_hr, hrv, spo2.saturating_sub(delta), sleep, activity);
            prop_assert!(compute_score(&spo2_down) >= score);

            let sleep_down = reading(base_hr, hrv, spo2, (sleep - delta as f64 / 10.0).max(0.0), activity);
            prop_assert!(compute_score(&sleep_down) >= score);

            let activity_up = reading(base_hr, hrv, spo2, sleep, (activity + delta).min(10));
            prop_assert!(compute_score(&activity_up) >= score);
        }
    }
}
