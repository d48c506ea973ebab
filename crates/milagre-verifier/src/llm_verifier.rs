//! Model-judged claim verification

use crate::error::VerificationError;
use async_trait::async_trait;
use milagre_domain::traits::{ClaimVerifier, LlmProvider};
use milagre_domain::{Claim, Source, Verification};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Highest confidence a contradicted claim can keep
pub const CONTRADICTED_CONFIDENCE_CAP: u32 = 20;

/// What the model thinks of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Evidence backs the claim
    Supported,
    /// Evidence disputes the claim
    Contradicted,
    /// Not enough to say either way
    Unclear,
}

#[derive(Debug, Deserialize)]
struct VerdictResponse {
    verdict: Verdict,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    sources: Vec<VerdictSource>,
}

#[derive(Debug, Deserialize)]
struct VerdictSource {
    url: String,
    #[serde(default)]
    title: String,
}

/// Verifies claims by asking a text model for a verdict
///
/// Pairs well with a search-grounded model such as Gemini with grounding
/// enabled. Unlike [`crate::SearchVerifier`] this returns errors; the
/// orchestrator turns them into the unavailable outcome.
pub struct LlmVerifier<L: LlmProvider> {
    llm_provider: Arc<L>,
    acceptance_threshold: u8,
}

impl<L: LlmProvider> LlmVerifier<L> {
    /// Create a verifier with the given acceptance threshold
    pub fn new(llm_provider: L, acceptance_threshold: u8) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            acceptance_threshold,
        }
    }

    fn build_prompt(claim: &Claim) -> String {
        format!(
            r#"You are a fact-checker. Judge whether the following claim is accurate.

Claim: {}
Suggested search: {}

Respond with a single JSON object and nothing else:
{{
  "verdict": "supported" | "contradicted" | "unclear",
  "confidence": 0-100,
  "reasoning": "one sentence",
  "sources": [{{"url": "...", "title": "..."}}]
}}"#,
            claim.text, claim.search_query
        )
    }
}

/// Pull the JSON object out of a response that may be fenced or chatty
fn extract_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (start < end).then(|| &response[start..=end])
}

#[async_trait]
impl<L: LlmProvider + 'static> ClaimVerifier for LlmVerifier<L> {
    type Error = VerificationError;

    async fn verify(&self, claim: &Claim) -> Result<Verification, VerificationError> {
        let response = self
            .llm_provider
            .generate(&Self::build_prompt(claim))
            .await
            .map_err(|e| VerificationError::Llm(e.to_string()))?;

        let json = extract_object(&response)
            .ok_or_else(|| VerificationError::InvalidResponse("no JSON object in response".to_string()))?;
        let parsed: VerdictResponse = serde_json::from_str(json)
            .map_err(|e| VerificationError::InvalidResponse(e.to_string()))?;

        let mut confidence = parsed.confidence.clamp(0.0, 100.0).round() as u32;
        if parsed.verdict == Verdict::Contradicted {
            confidence = confidence.min(CONTRADICTED_CONFIDENCE_CAP);
        }

        let provider = self.llm_provider.model_name().to_string();
        let sources = parsed
            .sources
            .into_iter()
            .map(|s| Source::new(s.url, s.title, "", provider.clone()))
            .collect();

        let reasoning = if parsed.reasoning.is_empty() {
            format!("{:?}", parsed.verdict).to_lowercase()
        } else {
            parsed.reasoning
        };

        debug!(position = claim.position, verdict = ?parsed.verdict, confidence, "Model verdict");

        let mut verification = Verification::scored(
            claim.clone(),
            confidence,
            self.acceptance_threshold,
            sources,
            reasoning,
        );
        // Only a supported verdict can verify, whatever the confidence
        if parsed.verdict != Verdict::Supported {
            verification.verified = false;
        }
        Ok(verification)
    }

    fn backends(&self) -> Vec<String> {
        vec![format!("llm:{}", self.llm_provider.model_name())]
    }
}
