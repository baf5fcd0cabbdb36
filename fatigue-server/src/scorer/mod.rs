//! Fatigue scorers
//!
//! The HTTP adapter only sees [`FatigueScorer`]. Two implementations:
//! - [`RuleBasedScorer`]: deterministic threshold arithmetic
//! - [`GeminiScorer`]: delegates to the Gemini text model

use async_trait::async_trait;
use fatigue_common::config::{ScorerKind, ServerConfig};
use fatigue_common::gemini::ReplyError;
use fatigue_common::{FatigueAssessment, TelemetryReading};
use std::sync::Arc;
use thiserror::Error;

pub mod gemini;
pub mod rules;

pub use gemini::GeminiScorer;
pub use rules::RuleBasedScorer;

/// Scorer failures (all map to HTTP 500)
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("Scorer not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Model returned no text")]
    EmptyReply,

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

/// Turns one reading into an assessment
#[async_trait]
pub trait FatigueScorer: Send + Sync {
    /// Scorer identifier reported by /health ("rules", "gemini")
    fn name(&self) -> &'static str;

    async fn assess(&self, reading: &TelemetryReading) -> Result<FatigueAssessment, ScorerError>;
}

/// Construct the scorer selected by the startup configuration
pub fn build_scorer(config: &ServerConfig) -> Result<Arc<dyn FatigueScorer>, ScorerError> {
    match config.scorer {
        ScorerKind::Rules => Ok(Arc::new(RuleBasedScorer)),
        ScorerKind::Gemini => {
            let gemini = config.gemini.clone().ok_or_else(|| {
                ScorerError::NotConfigured("Gemini API key is missing".to_string())
            })?;
            Ok(Arc::new(GeminiScorer::new(gemini)?))
        }
    }
}
