//! Pipeline error types

use thiserror::Error;

/// Whole-run failures; per-claim problems never surface here
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Nothing left to check once frontmatter is removed
    #[error("Article content is empty")]
    EmptyContent,

    /// Claim extraction failed and no fallback was available
    #[error("Claim extraction failed: {0}")]
    Extraction(String),

    /// Caller options out of range
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Frontmatter block is not valid YAML
    #[error("Invalid frontmatter: {0}")]
    Frontmatter(String),
}
