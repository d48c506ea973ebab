//! `check` against a stand-in fact-check service

use milagre_cli::{CliError, FactCheckClient};
use milagre_domain::{Claim, FactCheckResult, RunId, Verification};
use milagre_factcheck::FactCheckData;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_data() -> FactCheckData {
    let verifications = vec![Verification::scored(
        Claim::new("Bitcoin reached $100,000 in December 2024.", 0),
        72,
        60,
        vec![],
        "verified with 5 source(s) from 1 provider(s)",
    )];
    FactCheckData::from(FactCheckResult::aggregate(
        RunId::new(),
        verifications,
        60,
        vec!["brave".to_string()],
        chrono::Utc::now(),
    ))
}

#[tokio::test]
async fn test_successful_check() {
    let server = MockServer::start().await;
    let data = sample_data();

    Mock::given(method("POST"))
        .and(path("/fact-check"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(serde_json::json!({ "markdown": "# Post", "threshold": 60 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true, "data": data })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FactCheckClient::new(&format!("{}/", server.uri()), Some("tok".to_string())).unwrap();
    let received = client.fact_check("# Post", Some(60), None).await.unwrap();

    assert_eq!(received, data);
    assert!(received.result.passed);
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fact-check"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_json(serde_json::json!({ "error": "Rate limit exceeded", "retryAfter": 30 })),
        )
        .mount(&server)
        .await;

    let client = FactCheckClient::new(&server.uri(), None).unwrap();
    let result = client.fact_check("# Post", None, None).await;
    assert!(matches!(result, Err(CliError::RateLimited { retry_after: 30 })));
}

#[tokio::test]
async fn test_validation_details_in_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fact-check"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "success": false,
            "error": "Validation failed",
            "details": [{ "field": "markdown", "message": "markdown is required" }]
        })))
        .mount(&server)
        .await;

    let client = FactCheckClient::new(&server.uri(), None).unwrap();
    match client.fact_check(" ", None, None).await {
        Err(CliError::Server { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Validation failed (markdown: markdown is required)");
        }
        other => panic!("expected server error, got {:?}", other.map(|d| d.result.score)),
    }
}

#[tokio::test]
async fn test_server_unreachable() {
    let client = FactCheckClient::new("http://127.0.0.1:1", None).unwrap();
    let result = client.fact_check("# Post", None, None).await;
    assert!(matches!(result, Err(CliError::Connection(_))));
}
