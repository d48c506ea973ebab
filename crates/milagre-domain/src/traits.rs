//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! infrastructure. Implementations live in other crates.

use crate::{Claim, Verification};
use async_trait::async_trait;

/// Trait for text-model operations
///
/// Implemented by the infrastructure layer (milagre-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the underlying model, for logs and metadata
    fn model_name(&self) -> &str;
}

/// Trait for turning article text into claims
///
/// Implemented by the application layer (milagre-extractor)
#[async_trait]
pub trait ClaimExtractor: Send + Sync {
    /// Error type for extraction operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extract at most `max_claims` claims from `body`, in source order
    async fn extract(
        &self,
        title: &str,
        body: &str,
        max_claims: usize,
    ) -> Result<Vec<Claim>, Self::Error>;
}

/// Trait for checking a single claim against external evidence
///
/// Implemented by the application layer (milagre-verifier)
#[async_trait]
pub trait ClaimVerifier: Send + Sync {
    /// Error type for verification operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Verify one claim
    async fn verify(&self, claim: &Claim) -> Result<Verification, Self::Error>;

    /// Names of the backends this verifier consults
    fn backends(&self) -> Vec<String>;
}
