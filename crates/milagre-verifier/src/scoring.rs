//! Confidence scoring from search evidence

use crate::config::VerifierConfig;
use milagre_domain::{Claim, Importance, Source, MAX_CONFIDENCE};
use std::collections::HashSet;

/// Phrases that mark a snippet as disputing what it reports on
const DEBUNK_MARKERS: &[&str] = &["false", "fake", "hoax", "debunked", "misleading", "not true"];

/// How a confidence value was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Final confidence, 0-100
    pub confidence: u8,
    /// Distinct URLs among the sources
    pub unique_sources: usize,
    /// Distinct backends among the sources
    pub providers: usize,
    /// Snippets carrying a debunk marker
    pub contradictions: usize,
}

/// Score a claim against the sources found for it
///
/// `min(unique * points_per_source, cap)`, plus the multi-provider and
/// high-importance bonuses, minus the penalty per contradicting snippet,
/// clamped to `0..=100`.
pub fn score_claim(claim: &Claim, sources: &[Source], config: &VerifierConfig) -> ScoreBreakdown {
    let unique_sources = sources.iter().map(|s| s.url.as_str()).collect::<HashSet<_>>().len();
    let providers = sources
        .iter()
        .map(|s| s.provider.as_str())
        .filter(|p| !p.is_empty())
        .collect::<HashSet<_>>()
        .len();
    let contradictions = sources.iter().filter(|s| contradicts(&s.snippet)).count();

    if unique_sources == 0 {
        return ScoreBreakdown {
            confidence: 0,
            unique_sources,
            providers,
            contradictions,
        };
    }

    let mut points = (unique_sources as u32)
        .saturating_mul(config.points_per_source)
        .min(config.source_points_cap);
    if providers > 1 {
        points += config.multi_provider_bonus;
    }
    if claim.importance == Importance::High {
        points += config.high_importance_bonus;
    }
    let penalty = (contradictions as u32).saturating_mul(config.contradiction_penalty);
    let confidence = points.saturating_sub(penalty).min(MAX_CONFIDENCE as u32) as u8;

    ScoreBreakdown {
        confidence,
        unique_sources,
        providers,
        contradictions,
    }
}

/// Whether a snippet contains a debunk marker as a whole word or phrase
pub fn contradicts(snippet: &str) -> bool {
    let lower = snippet.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    DEBUNK_MARKERS.iter().any(|marker| {
        let marker_words: Vec<&str> = marker.split(' ').collect();
        words.windows(marker_words.len()).any(|w| w == marker_words.as_slice())
    })
}
