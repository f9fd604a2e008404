use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Startup profile as submitted by the client.
///
/// All fields are free text; `funding_needs` in particular arrives as a
/// string on the wire (the original form posts it that way) and is only
/// interpreted numerically by the funding lookup, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserProfile {
    pub name: String,
    pub company: String,
    pub sector: String,
    #[serde(rename = "fundingNeeds")]
    pub funding_needs: String,
    #[serde(rename = "growthStage")]
    pub growth_stage: String,
}

/// A persisted profile: the submitted fields plus the generated identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: NewUserProfile,
}

/// A funding opportunity, populated out-of-band and read-only from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingOpportunity {
    pub name: String,
    pub amount: i64,
    pub sector: String,
    #[serde(rename = "eligibilityCriteria")]
    pub eligibility_criteria: String,
    pub deadline: chrono::DateTime<chrono::Utc>,
}

impl FundingOpportunity {
    /// The predicate every funding-lookup result must satisfy.
    pub fn matches(&self, sector: &str, max_amount: i64) -> bool {
        self.sector == sector && self.amount <= max_amount
    }
}

/// Outcome of one external recommendation run.
///
/// `Recommendation` is the clean case: the process ended with a JSON line
/// carrying a `recommendation` field. `Transcript` is the degraded-success
/// case: the final line was not parseable, so every emitted line is handed
/// back verbatim instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    Recommendation(String),
    Transcript(Vec<String>),
}
