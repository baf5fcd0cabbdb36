//! Gemini API client
//!
//! Sends the analysis prompt to the `generateContent` REST endpoint and
//! parses the model's text reply into an assessment. Single attempt, no
//! retry; any failure surfaces to the caller.

use async_trait::async_trait;
use fatigue_common::config::GeminiConfig;
use fatigue_common::gemini::{build_prompt, parse_reply};
use fatigue_common::{FatigueAssessment, TelemetryReading};
use serde::{Deserialize, Serialize};

use super::{FatigueScorer, ScorerError};

const USER_AGENT: &str = concat!("space-fatigue/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Scorer that delegates to the Gemini text model
pub struct GeminiScorer {
    http_client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiScorer {
    pub fn new(config: GeminiConfig) -> Result<Self, ScorerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScorerError::Network(e.to_string()))?;

        Ok(Self { http_client, config })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one prompt, return the model's raw text
    pub async fn generate_content(&self, prompt: &str) -> Result<String, ScorerError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.config.model, "Querying Gemini API");

        let response = self
            .http_client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScorerError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScorerError::Api(status.as_u16(), error_text));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ScorerError::Network(e.to_string()))?;

        body.text().ok_or(ScorerError::EmptyReply)
    }
}

#[async_trait]
impl FatigueScorer for GeminiScorer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn assess(&self, reading: &TelemetryReading) -> Result<FatigueAssessment, ScorerError> {
        let prompt = build_prompt(reading);
        let text = self.generate_content(&prompt).await?;

        match parse_reply(&text) {
            Ok(assessment) => {
                tracing::info!(
                    score = assessment.score,
                    state = %assessment.state,
                    alerts = assessment.alerts.len(),
                    "Gemini assessment parsed"
                );
                Ok(assessment)
            }
            Err(e) => {
                tracing::error!(error = %e, reply = %text, "Failed to decode JSON from model reply");
                Err(e.into())
            }
        }
    }
}
