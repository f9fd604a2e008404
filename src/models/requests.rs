use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::NewUserProfile;

/// Request to create a startup profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub sector: String,
    #[validate(length(min = 1))]
    #[serde(alias = "funding_needs", rename = "fundingNeeds")]
    pub funding_needs: String,
    #[validate(length(min = 1))]
    #[serde(alias = "growth_stage", rename = "growthStage")]
    pub growth_stage: String,
}

impl From<CreateProfileRequest> for NewUserProfile {
    fn from(req: CreateProfileRequest) -> Self {
        Self {
            name: req.name,
            company: req.company,
            sector: req.sector,
            funding_needs: req.funding_needs,
            growth_stage: req.growth_stage,
        }
    }
}

/// Request for the rule-based funding lookup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FundingQueryRequest {
    #[validate(length(min = 1))]
    pub sector: String,
    #[serde(alias = "funding_needs", rename = "fundingNeeds")]
    pub funding_needs: FundingNeeds,
}

/// Funding amount as it appears on the wire.
///
/// The form submits it as a string ("500000") but API callers reasonably
/// send a JSON number; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FundingNeeds {
    Number(i64),
    Text(String),
}

impl FundingNeeds {
    /// Interpret the wire value as a non-negative amount.
    pub fn as_amount(&self) -> Option<i64> {
        let amount = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        (amount >= 0).then_some(amount)
    }
}

/// Request for an AI-generated recommendation.
///
/// The free text is forwarded to the external process untouched; no length
/// or content checks happen on this path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRecommendRequest {
    #[serde(alias = "user_profile", rename = "userProfile")]
    pub user_profile: String,
}
