//! Verifier error types

use thiserror::Error;

/// Errors raised by search backends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Transport failure (connect, timeout, TLS)
    #[error("{provider} request failed: {message}")]
    Http {
        /// Backend name
        provider: String,
        /// Underlying error
        message: String,
    },

    /// Non-success HTTP status
    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        /// Backend name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Error message from the response body, if any
        message: String,
    },

    /// Response body did not match the expected schema
    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse {
        /// Backend name
        provider: String,
        /// Parse error
        message: String,
    },

    /// Missing or invalid credentials
    #[error("Configuration error: {0}")]
    Config(String),

    /// No backend is configured
    #[error("No search backend configured")]
    NoProviders,

    /// Every configured backend failed
    #[error("All search backends failed: {}", .0.join("; "))]
    AllFailed(Vec<String>),
}

/// Errors raised while verifying a claim
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Search failure
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The model's verdict could not be parsed
    #[error("Invalid verdict: {0}")]
    InvalidResponse(String),
}
