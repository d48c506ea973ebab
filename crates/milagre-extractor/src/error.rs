//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Nothing to extract from
    #[error("Article body is empty")]
    EmptyInput,

    /// Extraction timeout
    #[error("Extraction timeout")]
    Timeout,

    /// Invalid claim format in LLM response
    #[error("Invalid claim format: {0}")]
    InvalidFormat(String),
}
