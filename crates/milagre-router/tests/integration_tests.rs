//! Integration tests for the fact-check service

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use milagre_domain::FactCheckResult;
use milagre_extractor::HeuristicExtractor;
use milagre_factcheck::{FactCheckConfig, FactCheckOptions, FactCheckService, FactChecker, PipelineError};
use milagre_router::{
    config::RateLimitConfig,
    error::{ErrorResponse, RateLimitedResponse},
    handlers::{create_router, AppState, FactCheckResponse, HealthCheckResponse},
    rate_limit::{InMemoryRateLimitStore, ManualClock, RateLimiter},
    session::{SessionClaims, SessionManager},
};
use jsonwebtoken::{encode, EncodingKey, Header};
use milagre_verifier::{MultiSearch, SearchVerifier, StaticSearchProvider, VerifierConfig};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const TEST_SECRET: &str = "test-secret-key";

const ARTICLE: &str = r#"---
title: "Test"
---

# Market wrap

Bitcoin reached $100,000 in December 2024. The SEC approved spot ether ETFs in July 2024.
"#;

fn static_checker() -> Arc<dyn FactCheckService> {
    let search = MultiSearch::new(5).with_provider(
        StaticSearchProvider::new("static")
            .with_default_results(StaticSearchProvider::sources("static", 5)),
    );
    Arc::new(FactChecker::new(
        HeuristicExtractor::default(),
        SearchVerifier::new(search, VerifierConfig::default()),
        FactCheckConfig::default(),
    ))
}

/// Pipeline that always aborts
struct BrokenService;

#[async_trait]
impl FactCheckService for BrokenService {
    async fn fact_check(
        &self,
        _content: &str,
        _title: &str,
        _options: FactCheckOptions,
    ) -> Result<FactCheckResult, PipelineError> {
        Err(PipelineError::Extraction("model returned 500: quota exceeded".to_string()))
    }

    fn search_apis(&self) -> Vec<String> {
        Vec::new()
    }

    fn default_options(&self) -> FactCheckOptions {
        FactCheckOptions::default()
    }
}

/// Helper to create test application state
fn create_test_state(service: Arc<dyn FactCheckService>, limit: u32) -> (AppState, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    let state = AppState {
        service,
        rate_limiter: Arc::new(RateLimiter::new(
            Arc::new(InMemoryRateLimitStore::default()),
            Arc::new(clock.clone()),
        )),
        session_manager: Arc::new(SessionManager::new(TEST_SECRET)),
        rate_limit: RateLimitConfig {
            limit,
            window_secs: 60,
        },
    };
    (state, clock)
}

/// Sign a session token the way the session issuer does
fn session_token(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = SessionClaims {
        user_id: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap()
}

fn fact_check_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/fact-check")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-ratelimit-limit").is_none());

    let health: HealthCheckResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.search_apis, vec!["static"]);
}

#[tokio::test]
async fn test_fact_check_success_shape() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let response = send(
        &app,
        fact_check_request(serde_json::json!({ "markdown": ARTICLE, "threshold": 60 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-ratelimit-limit"], "10");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "9");
    assert!(response.headers()["x-ratelimit-reset"]
        .to_str()
        .unwrap()
        .ends_with('Z'));

    let bytes = body_bytes(response).await;
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["totalClaims"], 2);
    assert_eq!(json["data"]["threshold"], 60);
    assert_eq!(json["data"]["status"], "passed");
    assert_eq!(json["data"]["searchApisUsed"][0], "static");
    assert!(json["data"]["report"].as_str().unwrap().contains("FACT-CHECK REPORT"));

    let typed: FactCheckResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(typed.data.result.passed);
    assert_eq!(typed.data.result.verifications.len(), 2);
}

#[tokio::test]
async fn test_missing_markdown_is_400() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let response = send(&app, fact_check_request(serde_json::json!({ "threshold": 50 }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!error.success);
    assert_eq!(error.details[0].field, "markdown");
}

#[tokio::test]
async fn test_out_of_range_options_are_400() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let response = send(
        &app,
        fact_check_request(serde_json::json!({ "markdown": ARTICLE, "threshold": 150, "maxClaims": 0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let fields: Vec<_> = error.details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, vec!["threshold", "maxClaims"]);
}

#[tokio::test]
async fn test_fractional_threshold_is_400() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let response = send(
        &app,
        fact_check_request(serde_json::json!({ "markdown": ARTICLE, "threshold": 70.5 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error.error, "Validation failed");
    assert_eq!(error.details.len(), 1);
    assert_eq!(error.details[0].field, "threshold");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/fact-check")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_frontmatter_is_400() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let markdown = "---\ntitle: [unclosed\n---\n\nBitcoin reached $100,000 in December 2024.";
    let response = send(&app, fact_check_request(serde_json::json!({ "markdown": markdown }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_frontmatter_only_article_is_generic_500() {
    let (state, _) = create_test_state(static_checker(), 10);
    let app = create_router(state);

    let markdown = "---\ntitle: x\n---\n";
    let response = send(&app, fact_check_request(serde_json::json!({ "markdown": markdown }))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!error.success);
    assert_eq!(error.error, "Fact-check failed");
    assert!(error.details.is_empty());
}

#[tokio::test]
async fn test_pipeline_failure_is_generic_500() {
    let (state, _) = create_test_state(Arc::new(BrokenService), 10);
    let app = create_router(state);

    let response = send(&app, fact_check_request(serde_json::json!({ "markdown": ARTICLE }))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!error.success);
    assert_eq!(error.error, "Fact-check failed");
    assert!(!error.error.contains("quota"));
}

#[tokio::test]
async fn test_rate_limit_returns_429_then_recovers() {
    let (state, clock) = create_test_state(static_checker(), 2);
    let app = create_router(state);
    let body = serde_json::json!({ "markdown": ARTICLE });

    assert_eq!(send(&app, fact_check_request(body.clone())).await.status(), StatusCode::OK);
    assert_eq!(send(&app, fact_check_request(body.clone())).await.status(), StatusCode::OK);

    clock.advance_ms(15_000);
    let limited = send(&app, fact_check_request(body.clone())).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.headers()["retry-after"], "45");
    assert_eq!(limited.headers()["x-ratelimit-limit"], "2");
    assert_eq!(limited.headers()["x-ratelimit-remaining"], "0");

    let payload: RateLimitedResponse = serde_json::from_slice(&body_bytes(limited).await).unwrap();
    assert_eq!(payload.error, "Rate limit exceeded");
    assert_eq!(payload.retry_after, 45);

    clock.advance_ms(45_000);
    assert_eq!(send(&app, fact_check_request(body)).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_counts_invalid_requests() {
    let (state, _) = create_test_state(static_checker(), 1);
    let app = create_router(state);

    let first = send(&app, fact_check_request(serde_json::json!({}))).await;
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = send(&app, fact_check_request(serde_json::json!({ "markdown": ARTICLE }))).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_session_token_isolates_callers() {
    let (state, _) = create_test_state(static_checker(), 1);
    let app = create_router(state);
    let body = serde_json::json!({ "markdown": ARTICLE }).to_string();

    let authed = |user: &str| {
        let token = session_token(user);
        Request::builder()
            .method("POST")
            .uri("/fact-check")
            .header("content-type", "application/json")
            .header("x-forwarded-for", "203.0.113.7")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::from(body.clone()))
            .unwrap()
    };

    assert_eq!(send(&app, authed("user-A")).await.status(), StatusCode::OK);
    assert_eq!(send(&app, authed("user-A")).await.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(send(&app, authed("user-B")).await.status(), StatusCode::OK);

    // Same IP without a token has its own counter
    let anonymous = send(&app, fact_check_request(serde_json::json!({ "markdown": ARTICLE }))).await;
    assert_eq!(anonymous.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let (state, _) = create_test_state(static_checker(), 1);
    let app = create_router(state);

    for _ in 0..3 {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(send(&app, request).await.status(), StatusCode::OK);
    }
}
