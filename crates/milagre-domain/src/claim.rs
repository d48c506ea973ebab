//! Claim module - the atomic unit a fact-check run verifies

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifier for a single fact-check run, based on UUIDv7
///
/// UUIDv7 sorts chronologically, so run ids in logs line up with the order
/// in which articles were submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use milagre_domain::RunId;
    ///
    /// let a = RunId::new();
    /// let b = RunId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a RunId from its string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid run id: {}", e))
    }

    /// Millisecond Unix timestamp embedded in the id
    pub fn timestamp_ms(&self) -> u64 {
        (self.0.as_u128() >> 80) as u64
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How much a claim matters to the article's overall accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Central figures: prices, dates, amounts
    High,
    /// Ordinary supporting facts
    #[default]
    Medium,
    /// Background or colour
    Low,
}

impl Importance {
    /// Parse from a lowercase string; unknown values map to `Medium`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Importance::High,
            "low" => Importance::Low,
            _ => Importance::Medium,
        }
    }

    /// Lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

/// A factual assertion extracted from an article
///
/// Claims are immutable once created and owned by the run that extracted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// The assertion as it should be read by a human
    pub text: String,

    /// Zero-based position in extraction order
    pub position: usize,

    /// Query sent to search backends when verifying this claim
    pub search_query: String,

    /// Relative weight of the claim
    #[serde(default)]
    pub importance: Importance,
}

impl Claim {
    /// Create a claim whose search query is its own text
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        let text = text.into();
        Self {
            search_query: text.clone(),
            text,
            position,
            importance: Importance::Medium,
        }
    }

    /// Override the search query
    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        if !query.trim().is_empty() {
            self.search_query = query;
        }
        self
    }

    /// Set the importance
    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    /// Normalized text used for duplicate detection
    pub fn dedupe_key(&self) -> String {
        self.text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Drop empty and duplicate claims, keep at most `max_claims`, and renumber
/// positions so they are contiguous in source order.
pub fn finalize_claims(candidates: Vec<Claim>, max_claims: usize) -> Vec<Claim> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| !c.text.trim().is_empty())
        .filter(|c| seen.insert(c.dedupe_key()))
        .take(max_claims)
        .enumerate()
        .map(|(position, claim)| Claim { position, ..claim })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_generation() {
        let id1 = RunId::new();
        let id2 = RunId::new();
        assert_ne!(id1, id2);
        assert!(id1 <= id2);
    }

    #[test]
    fn test_run_id_string_round_trip() {
        let id = RunId::new();
        let parsed = RunId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(RunId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_run_id_timestamp_is_recent() {
        let id = RunId::new();
        // 2024-01-01T00:00:00Z in ms
        assert!(id.timestamp_ms() > 1_704_067_200_000);
    }

    #[test]
    fn test_claim_defaults_search_query_to_text() {
        let claim = Claim::new("Bitcoin halved in April 2024.", 0);
        assert_eq!(claim.search_query, "Bitcoin halved in April 2024.");
        assert_eq!(claim.importance, Importance::Medium);
    }

    #[test]
    fn test_blank_search_query_is_ignored() {
        let claim = Claim::new("text", 0).with_search_query("   ");
        assert_eq!(claim.search_query, "text");
    }

    #[test]
    fn test_importance_parse() {
        assert_eq!(Importance::parse("HIGH"), Importance::High);
        assert_eq!(Importance::parse("low"), Importance::Low);
        assert_eq!(Importance::parse("whatever"), Importance::Medium);
    }

    #[test]
    fn test_finalize_dedupes_bounds_and_renumbers() {
        let claims = vec![
            Claim::new("A happened.", 3),
            Claim::new("  a   HAPPENED. ", 4),
            Claim::new("", 5),
            Claim::new("B happened.", 7),
            Claim::new("C happened.", 9),
        ];

        let finalized = finalize_claims(claims, 2);
        assert_eq!(finalized.len(), 2);
        assert_eq!(finalized[0].text, "A happened.");
        assert_eq!(finalized[0].position, 0);
        assert_eq!(finalized[1].text, "B happened.");
        assert_eq!(finalized[1].position, 1);
    }

    #[test]
    fn test_finalize_zero_max() {
        let claims = vec![Claim::new("A", 0)];
        assert!(finalize_claims(claims, 0).is_empty());
    }

    #[test]
    fn test_claim_wire_format() {
        let claim = Claim::new("ETH merged in 2022", 0).with_importance(Importance::High);
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["searchQuery"], "ETH merged in 2022");
        assert_eq!(json["importance"], "high");
    }
}
