use serde::{Deserialize, Serialize};

use crate::models::domain::BridgeOutcome;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Body of a successful AI recommendation call.
///
/// Clean parses answer with a single `recommendation`; the degraded case
/// answers with the full `recommendations` transcript so the caller always
/// receives something renderable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationResponse {
    Single { recommendation: String },
    Transcript { recommendations: Vec<String> },
}

impl From<BridgeOutcome> for RecommendationResponse {
    fn from(outcome: BridgeOutcome) -> Self {
        match outcome {
            BridgeOutcome::Recommendation(text) => Self::Single { recommendation: text },
            BridgeOutcome::Transcript(lines) => Self::Transcript { recommendations: lines },
        }
    }
}
