//! Aggregate verdict for one article
//!
//! Scoring is deterministic: the score is the rounded percentage of claims
//! that were verified, and a run passes when the score reaches the threshold.

use crate::{RunId, Verification};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Terminal status of a fact-check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactCheckStatus {
    /// Score reached the threshold
    Passed,
    /// Score fell short of the threshold
    Failed,
    /// Nothing verifiable was found in the article
    NoClaims,
}

impl FactCheckStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FactCheckStatus::Passed => "passed",
            FactCheckStatus::Failed => "failed",
            FactCheckStatus::NoClaims => "no-claims",
        }
    }
}

/// Percentage of verified claims, rounded half away from zero
///
/// Returns 0 when there are no claims.
///
/// # Examples
///
/// ```
/// use milagre_domain::compute_score;
///
/// assert_eq!(compute_score(2, 3), 67);
/// assert_eq!(compute_score(0, 0), 0);
/// ```
pub fn compute_score(verified: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let verified = verified.min(total);
    ((verified as f64 * 100.0) / total as f64).round() as u8
}

/// Result of fact-checking one article
///
/// Computed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckResult {
    /// Correlation id for logs
    pub run_id: RunId,

    /// `score >= threshold`
    pub passed: bool,

    /// 0-100
    pub score: u8,

    /// Threshold the score was compared against
    pub threshold: u8,

    /// Run outcome
    pub status: FactCheckStatus,

    /// Number of claims checked
    pub total_claims: usize,

    /// Claims whose verification succeeded
    pub verified_claims: usize,

    /// Claims whose verification did not succeed
    pub failed_claims: usize,

    /// One entry per claim, in extraction order
    pub verifications: Vec<Verification>,

    /// Unique source URLs consulted, in first-seen order
    pub sources: Vec<String>,

    /// Search backends the verifier used
    #[serde(rename = "searchApisUsed")]
    pub search_apis_used: Vec<String>,

    /// When the run finished
    pub checked_at: DateTime<Utc>,
}

impl FactCheckResult {
    /// Aggregate per-claim verifications into a verdict
    ///
    /// `verifications` must already be in extraction order.
    pub fn aggregate(
        run_id: RunId,
        verifications: Vec<Verification>,
        threshold: u8,
        search_apis_used: Vec<String>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let total_claims = verifications.len();
        let verified_claims = verifications.iter().filter(|v| v.verified).count();
        let failed_claims = total_claims - verified_claims;

        let score = compute_score(verified_claims, total_claims);
        let passed = score >= threshold;

        let status = if total_claims == 0 {
            FactCheckStatus::NoClaims
        } else if passed {
            FactCheckStatus::Passed
        } else {
            FactCheckStatus::Failed
        };

        let mut seen = HashSet::new();
        let sources = verifications
            .iter()
            .flat_map(|v| v.sources.iter().map(|s| s.url.clone()))
            .filter(|url| seen.insert(url.clone()))
            .collect();

        Self {
            run_id,
            passed,
            score,
            threshold,
            status,
            total_claims,
            verified_claims,
            failed_claims,
            verifications,
            sources,
            search_apis_used,
            checked_at,
        }
    }
}
