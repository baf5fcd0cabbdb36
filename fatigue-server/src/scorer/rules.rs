//! Rule-based scorer backed by the deterministic evaluator

use async_trait::async_trait;
use fatigue_common::{evaluate, FatigueAssessment, TelemetryReading};

use super::{FatigueScorer, ScorerError};

/// Fixed threshold arithmetic; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedScorer;

#[async_trait]
impl FatigueScorer for RuleBasedScorer {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn assess(&self, reading: &TelemetryReading) -> Result<FatigueAssessment, ScorerError> {
        Ok(evaluate(reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatigue_common::FatigueState;

    #[tokio::test]
    async fn test_rules_scorer_matches_evaluator() {
        let reading = TelemetryReading {
            hr: 45,
            hrv: 25,
            spo2: 92,
            sleep: 4.0,
            activity: 9,
        };

        let assessment = RuleBasedScorer.assess(&reading).await.unwrap();
        assert_eq!(assessment, evaluate(&reading));
        assert_eq!(assessment.state, FatigueState::Critical);
    }
}
