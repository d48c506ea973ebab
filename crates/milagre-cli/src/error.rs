//! Error types for the CLI application.

use milagre_factcheck::PipelineError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The service answered with an error
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// The service refused the request under its rate limit
    #[error("Rate limit exceeded, retry in {retry_after}s")]
    RateLimited {
        /// Seconds until the window resets
        retry_after: u64,
    },

    /// In-process pipeline failure
    #[error("Fact-check failed: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CliError::Connection(e.to_string())
        } else {
            match e.status() {
                Some(status) => CliError::Server {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => CliError::Connection(e.to_string()),
            }
        }
    }
}
