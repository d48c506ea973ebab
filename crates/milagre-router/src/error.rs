//! HTTP error mapping

use crate::rate_limit::RateLimitDecision;
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use milagre_factcheck::PipelineError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// One invalid request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as sent on the wire
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    /// Build a field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `{success: false, error, details?}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
    /// Field-level problems, for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

/// `{error, retryAfter}` sent with a 429
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedResponse {
    /// Error message
    pub error: String,
    /// Seconds until the window resets
    pub retry_after: u64,
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Caller exceeded the rate limit
    #[error("Rate limit exceeded")]
    RateLimited {
        /// The denying decision
        decision: RateLimitDecision,
        /// Seconds until the window resets
        retry_after_secs: u64,
    },

    /// The pipeline aborted the run
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    /// Validation failure on a single field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }
}

fn bad_request(error: String, details: Vec<FieldError>) -> Response {
    let body = ErrorResponse {
        success: false,
        error,
        details,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => bad_request("Validation failed".to_string(), details),
            ApiError::RateLimited {
                decision,
                retry_after_secs,
            } => {
                let body = RateLimitedResponse {
                    error: "Rate limit exceeded".to_string(),
                    retry_after: retry_after_secs,
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                crate::handlers::apply_rate_limit_headers(response.headers_mut(), &decision);
                response
                    .headers_mut()
                    .insert("retry-after", HeaderValue::from(retry_after_secs));
                response
            }
            ApiError::Pipeline(PipelineError::Frontmatter(message)) => bad_request(
                "Validation failed".to_string(),
                vec![FieldError::new("markdown", format!("invalid frontmatter: {}", message))],
            ),
            ApiError::Pipeline(PipelineError::InvalidOptions(message)) => {
                bad_request(format!("Invalid options: {}", message), Vec::new())
            }
            ApiError::Pipeline(e) => {
                error!("Fact-check failed: {}", e);
                let body = ErrorResponse {
                    success: false,
                    error: "Fact-check failed".to_string(),
                    details: Vec::new(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::invalid("markdown", "required").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PipelineError::Frontmatter("bad".into())).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PipelineError::Extraction("llm down".into())).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(PipelineError::EmptyContent).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limited_headers() {
        let decision = RateLimitDecision {
            allowed: false,
            limit: 2,
            remaining: 0,
            reset_at: 1_700_000_060_000,
        };
        let response = ApiError::RateLimited {
            decision,
            retry_after_secs: 42,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "42");
        assert_eq!(response.headers()["x-ratelimit-limit"], "2");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
    }
}
