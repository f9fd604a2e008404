use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    ErrorResponse, FundingOpportunity, NewUserProfile, RecommendationResponse, StoredProfile,
};

/// Errors that can occur when calling the FundScope API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },
}

/// HTTP client for the FundScope API.
///
/// Thin wrapper mirroring the three endpoints; this is what the CLI
/// frontend talks through.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Submit a profile; returns the stored copy with its generated id.
    pub async fn create_profile(
        &self,
        profile: &NewUserProfile,
    ) -> Result<StoredProfile, ApiError> {
        let response = self
            .client
            .post(self.url("/profiles"))
            .json(profile)
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Rule-based lookup of opportunities for a sector and funding need.
    pub async fn funding_recommend(
        &self,
        sector: &str,
        funding_needs: &str,
    ) -> Result<Vec<FundingOpportunity>, ApiError> {
        let response = self
            .client
            .post(self.url("/funding/recommend"))
            .json(&json!({ "sector": sector, "fundingNeeds": funding_needs }))
            .send()
            .await?;

        Self::parse(response).await
    }

    /// AI recommendation for a free-text company description.
    pub async fn ai_recommend(&self, text: &str) -> Result<RecommendationResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/ai/recommend"))
            .json(&json!({ "userProfile": text }))
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => format!("{}: {}", body.error, body.message),
                Err(_) => "unable to read error body".to_string(),
            };
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(
            client.url("/profiles"),
            "http://localhost:8080/api/v1/profiles"
        );
    }
}
