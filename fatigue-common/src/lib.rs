//! # Space Fatigue Common Library
//!
//! Shared code for the fatigue monitor service including:
//! - Telemetry reading and assessment types
//! - Rule-based fatigue evaluation
//! - Gemini prompt construction and reply parsing
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod evaluator;
pub mod gemini;
pub mod telemetry;

pub use error::{Error, Result};
pub use evaluator::{classify_state, compute_score, evaluate, generate_alerts};
pub use telemetry::{Alert, AlertLevel, FatigueAssessment, FatigueState, Metric, TelemetryReading};
