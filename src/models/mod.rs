// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BridgeOutcome, FundingOpportunity, NewUserProfile, StoredProfile};
pub use requests::{AiRecommendRequest, CreateProfileRequest, FundingNeeds, FundingQueryRequest};
pub use responses::{ErrorResponse, HealthResponse, RecommendationResponse};
