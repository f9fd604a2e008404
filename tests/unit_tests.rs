// Unit tests for FundScope

use fundscope::models::{
    BridgeOutcome, CreateProfileRequest, FundingNeeds, FundingOpportunity, FundingQueryRequest,
    NewUserProfile, RecommendationResponse, StoredProfile,
};
use fundscope::parse_output;
use uuid::Uuid;
use validator::Validate;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_json_final_line_yields_exact_recommendation() {
    let outcome = parse_output(lines(&[
        "Python script started",
        "Model loaded successfully",
        r#"{"recommendation":"X"}"#,
    ]));
    assert_eq!(outcome, BridgeOutcome::Recommendation("X".to_string()));
}

#[test]
fn test_non_json_final_line_yields_full_transcript() {
    let input = lines(&["Python script started", "No user info provided"]);
    let outcome = parse_output(input.clone());
    assert_eq!(outcome, BridgeOutcome::Transcript(input));
}

#[test]
fn test_recommendation_with_embedded_quotes() {
    let outcome = parse_output(lines(&[
        r#"{"recommendation":"apply to the \"Seed One\" fund"}"#,
    ]));
    assert_eq!(
        outcome,
        BridgeOutcome::Recommendation(r#"apply to the "Seed One" fund"#.to_string())
    );
}

#[test]
fn test_funding_query_accepts_string_amount() {
    let req: FundingQueryRequest =
        serde_json::from_str(r#"{"sector":"fintech","fundingNeeds":"1000000"}"#).unwrap();
    assert!(req.validate().is_ok());
    assert_eq!(req.funding_needs.as_amount(), Some(1_000_000));
}

#[test]
fn test_funding_query_rejects_non_numeric_amount() {
    let req: FundingQueryRequest =
        serde_json::from_str(r#"{"sector":"fintech","fundingNeeds":"plenty"}"#).unwrap();
    assert_eq!(req.funding_needs.as_amount(), None);
}

#[test]
fn test_funding_needs_negative_number_rejected() {
    assert_eq!(FundingNeeds::Number(-1).as_amount(), None);
    assert_eq!(FundingNeeds::Number(0).as_amount(), Some(0));
}

#[test]
fn test_opportunity_predicate_filters_sector_and_amount() {
    let fintech = FundingOpportunity {
        name: "Fintech Growth Fund".to_string(),
        amount: 500_000,
        sector: "fintech".to_string(),
        eligibility_criteria: "series A or earlier".to_string(),
        deadline: chrono::Utc::now(),
    };
    let biotech = FundingOpportunity {
        name: "Biotech Seed".to_string(),
        amount: 100_000,
        sector: "biotech".to_string(),
        eligibility_criteria: "pre-clinical".to_string(),
        deadline: chrono::Utc::now(),
    };

    // Query: sector fintech, up to 1,000,000: only the first qualifies.
    assert!(fintech.matches("fintech", 1_000_000));
    assert!(!biotech.matches("fintech", 1_000_000));
}

#[test]
fn test_profile_round_trip_preserves_all_fields() {
    let body = r#"{
        "name": "A",
        "company": "B",
        "sector": "fintech",
        "fundingNeeds": "500000",
        "growthStage": "seed"
    }"#;

    let req: CreateProfileRequest = serde_json::from_str(body).unwrap();
    assert!(req.validate().is_ok());

    let profile = NewUserProfile::from(req);
    let stored = StoredProfile {
        id: Uuid::new_v4(),
        profile,
    };

    let echoed = serde_json::to_value(&stored).unwrap();
    assert_eq!(echoed["name"], "A");
    assert_eq!(echoed["company"], "B");
    assert_eq!(echoed["sector"], "fintech");
    assert_eq!(echoed["fundingNeeds"], "500000");
    assert_eq!(echoed["growthStage"], "seed");
    assert!(echoed["id"].as_str().is_some());
}

#[test]
fn test_profile_request_rejects_empty_fields() {
    let body = r#"{
        "name": "",
        "company": "B",
        "sector": "fintech",
        "fundingNeeds": "500000",
        "growthStage": "seed"
    }"#;

    let req: CreateProfileRequest = serde_json::from_str(body).unwrap();
    assert!(req.validate().is_err());
}

#[test]
fn test_recommendation_response_wire_shapes() {
    let single = RecommendationResponse::from(BridgeOutcome::Recommendation("X".to_string()));
    assert_eq!(
        serde_json::to_string(&single).unwrap(),
        r#"{"recommendation":"X"}"#
    );

    let degraded = RecommendationResponse::from(BridgeOutcome::Transcript(lines(&["a", "b"])));
    assert_eq!(
        serde_json::to_string(&degraded).unwrap(),
        r#"{"recommendations":["a","b"]}"#
    );
}
