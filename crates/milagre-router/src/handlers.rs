//! HTTP request handlers for the fact-check service.
//!
//! `POST /fact-check` runs the pipeline behind a fixed-window rate limit;
//! `GET /health` is unlimited.

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::identity::{caller_identity, rate_limit_key};
use crate::rate_limit::{RateLimitDecision, RateLimiter};
use crate::session::SessionManager;
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{DateTime, SecondsFormat, Utc};
use milagre_factcheck::{
    parse_article, FactCheckData, FactCheckOptions, FactCheckService, MAX_CLAIMS_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Scope prefix for fact-check rate-limit keys
pub const FACT_CHECK_SCOPE: &str = "fact-check";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The fact-check pipeline
    pub service: Arc<dyn FactCheckService>,
    /// Fixed-window counters
    pub rate_limiter: Arc<RateLimiter>,
    /// Bearer token validation for caller identity
    pub session_manager: Arc<SessionManager>,
    /// Limit applied to `POST /fact-check`
    pub rate_limit: RateLimitConfig,
}

/// Fact-check request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckRequest {
    /// Article markdown, frontmatter included
    #[serde(default)]
    pub markdown: Option<String>,
    /// Publication threshold, 0-100
    ///
    /// Read as any JSON number so fractional values get a field-level
    /// validation error instead of a body rejection.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Claim bound, 1-50
    #[serde(default)]
    pub max_claims: Option<f64>,
}

/// A whole number within `min..=max`
fn whole_in_range(value: f64, min: u64, max: u64) -> Option<u64> {
    let in_range = value.is_finite()
        && value.fract() == 0.0
        && value >= min as f64
        && value <= max as f64;
    in_range.then_some(value as u64)
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    /// Article markdown
    pub markdown: String,
    /// Resolved options
    pub options: FactCheckOptions,
}

impl FactCheckRequest {
    /// Check every field, filling unset options from `defaults`
    pub fn validate(self, defaults: FactCheckOptions) -> Result<ValidRequest, ApiError> {
        let mut details = Vec::new();

        let markdown = match self.markdown {
            Some(m) if !m.trim().is_empty() => m,
            _ => {
                details.push(crate::error::FieldError::new("markdown", "markdown is required"));
                String::new()
            }
        };

        let threshold = match self.threshold {
            None => defaults.threshold,
            Some(t) => match whole_in_range(t, 0, 100) {
                Some(t) => t as u8,
                None => {
                    details.push(crate::error::FieldError::new(
                        "threshold",
                        "threshold must be a whole number between 0 and 100",
                    ));
                    defaults.threshold
                }
            },
        };

        let max_claims = match self.max_claims {
            None => defaults.max_claims,
            Some(n) => match whole_in_range(n, 1, MAX_CLAIMS_LIMIT as u64) {
                Some(n) => n as usize,
                None => {
                    details.push(crate::error::FieldError::new(
                        "maxClaims",
                        format!("maxClaims must be a whole number between 1 and {}", MAX_CLAIMS_LIMIT),
                    ));
                    defaults.max_claims
                }
            },
        };

        if !details.is_empty() {
            return Err(ApiError::Validation(details));
        }

        Ok(ValidRequest {
            markdown,
            options: FactCheckOptions {
                threshold,
                max_claims,
            },
        })
    }
}

/// `{success: true, data}`
#[derive(Debug, Serialize, Deserialize)]
pub struct FactCheckResponse {
    /// Always true
    pub success: bool,
    /// Result plus rendered report
    pub data: FactCheckData,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Search backends configured for verification
    pub search_apis: Vec<String>,
}

/// POST /fact-check - Fact-check one markdown article
async fn fact_check(
    State(state): State<AppState>,
    payload: Result<Json<FactCheckRequest>, JsonRejection>,
) -> Result<Json<FactCheckResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::invalid("body", e.body_text()))?;
    let valid = request.validate(state.service.default_options())?;

    let article = parse_article(&valid.markdown)?;
    debug!(title = %article.title, "Parsed article");

    let result = state
        .service
        .fact_check(&article.body, &article.title, valid.options)
        .await?;
    info!(
        title = %article.title,
        score = result.score,
        status = result.status.as_str(),
        "Fact-check served"
    );

    Ok(Json(FactCheckResponse {
        success: true,
        data: FactCheckData::from(result),
    }))
}

/// GET /health - Liveness and configured backends
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        search_apis: state.service.search_apis(),
    })
}

/// Write `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));

    let reset = i64::try_from(decision.reset_at)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true));
    if let Some(value) = reset.and_then(|r| HeaderValue::from_str(&r).ok()) {
        headers.insert("x-ratelimit-reset", value);
    }
}

/// Rate-limit layer: counts the caller's request before the handler runs
async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = caller_identity(request.headers(), &state.session_manager);
    let key = rate_limit_key(FACT_CHECK_SCOPE, &identity);

    let decision = state
        .rate_limiter
        .check(&key, state.rate_limit.limit, state.rate_limit.window_ms());
    if !decision.allowed {
        let retry_after_secs = decision.retry_after_secs(state.rate_limiter.now_ms());
        info!(key = %key, retry_after_secs, "Rate limit exceeded");
        return Err(ApiError::RateLimited {
            decision,
            retry_after_secs,
        });
    }

    let mut response = next.run(request).await;
    apply_rate_limit_headers(response.headers_mut(), &decision);
    Ok(response)
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let limited = AxumRouter::new()
        .route("/fact-check", post(fact_check))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    AxumRouter::new()
        .route("/health", get(health_check))
        .merge(limited)
        .with_state(state)
}
