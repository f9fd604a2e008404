//! FundScope - funding recommendation service
//!
//! Collects startup profiles and returns funding-opportunity
//! recommendations, either from rule-based record-store lookups or by
//! delegating free text to an external AI-capable process.

pub mod client;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use models::{
    BridgeOutcome, FundingOpportunity, NewUserProfile, RecommendationResponse, StoredProfile,
};
pub use services::{bridge::parse_output, BridgeError, RecordStore, Recommender, ScriptBridge};
