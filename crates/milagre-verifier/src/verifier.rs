//! Search-backed claim verification

use crate::config::VerifierConfig;
use crate::error::VerificationError;
use crate::scoring::score_claim;
use crate::search::MultiSearch;
use async_trait::async_trait;
use milagre_domain::traits::ClaimVerifier;
use milagre_domain::{Claim, Verification};
use tracing::{debug, warn};

/// Reasoning for a claim no backend returned anything for
pub const REASON_NO_SOURCES: &str = "no sources found";

/// Verifies claims by counting corroborating web search results
///
/// Backend failures never escape: when every backend fails the claim gets
/// the "verification unavailable" outcome.
#[derive(Debug, Clone)]
pub struct SearchVerifier {
    search: MultiSearch,
    config: VerifierConfig,
}

impl SearchVerifier {
    /// Create a verifier over the given backends
    pub fn new(search: MultiSearch, config: VerifierConfig) -> Self {
        Self { search, config }
    }

    /// The scoring configuration
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }
}

#[async_trait]
impl ClaimVerifier for SearchVerifier {
    type Error = VerificationError;

    async fn verify(&self, claim: &Claim) -> Result<Verification, VerificationError> {
        let sources = match self.search.search(&claim.search_query).await {
            Ok(sources) => sources,
            Err(e) => {
                warn!(position = claim.position, "Search failed for claim: {}", e);
                return Ok(Verification::unavailable(claim.clone()));
            }
        };

        if sources.is_empty() {
            debug!(position = claim.position, "No sources found");
            return Ok(Verification::failed(claim.clone(), REASON_NO_SOURCES));
        }

        let score = score_claim(claim, &sources, &self.config);
        let verified = score.confidence >= self.config.acceptance_threshold;

        let mut reasoning = if verified {
            format!(
                "verified with {} source(s) from {} provider(s)",
                score.unique_sources, score.providers
            )
        } else {
            format!("low confidence: only {} source(s) found", score.unique_sources)
        };
        if score.contradictions > 0 {
            reasoning.push_str(&format!("; {} source(s) dispute the claim", score.contradictions));
        }

        debug!(
            position = claim.position,
            confidence = score.confidence,
            sources = score.unique_sources,
            "Claim scored"
        );

        Ok(Verification::scored(
            claim.clone(),
            score.confidence as u32,
            self.config.acceptance_threshold,
            sources,
            reasoning,
        ))
    }

    fn backends(&self) -> Vec<String> {
        self.search.names()
    }
}
