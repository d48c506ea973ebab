//! Outcome of checking one claim

use crate::{Claim, Source};
use serde::{Deserialize, Serialize};

/// Upper bound of the confidence scale
pub const MAX_CONFIDENCE: u8 = 100;

/// Reasoning attached to a claim whose backend call failed
pub const REASON_UNAVAILABLE: &str = "verification unavailable";

/// Reasoning attached to a claim the run ran out of time for
pub const REASON_TIMED_OUT: &str = "verification timed out";

/// Result of verifying a single claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// The claim that was checked
    pub claim: Claim,

    /// Whether confidence reached the acceptance threshold
    pub verified: bool,

    /// Corroboration strength, 0-100
    pub confidence: u8,

    /// Evidence found
    pub sources: Vec<Source>,

    /// Short human-readable explanation
    pub reasoning: String,
}

impl Verification {
    /// Build a verification, deriving `verified` from the acceptance threshold
    ///
    /// Confidence is clamped to `0..=100`.
    pub fn scored(
        claim: Claim,
        confidence: u32,
        acceptance_threshold: u8,
        sources: Vec<Source>,
        reasoning: impl Into<String>,
    ) -> Self {
        let confidence = confidence.min(MAX_CONFIDENCE as u32) as u8;
        Self {
            claim,
            verified: confidence >= acceptance_threshold,
            confidence,
            sources,
            reasoning: reasoning.into(),
        }
    }

    /// Degraded outcome used when the verification backend failed
    pub fn unavailable(claim: Claim) -> Self {
        Self::failed(claim, REASON_UNAVAILABLE)
    }

    /// Degraded outcome used when the run's wall-clock budget ran out
    pub fn timed_out(claim: Claim) -> Self {
        Self::failed(claim, REASON_TIMED_OUT)
    }

    /// Unverified outcome with zero confidence and no sources
    pub fn failed(claim: Claim, reasoning: impl Into<String>) -> Self {
        Self {
            claim,
            verified: false,
            confidence: 0,
            sources: Vec::new(),
            reasoning: reasoning.into(),
        }
    }
}
