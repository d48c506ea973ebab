//! Verifier configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scoring weights and search limits for claim verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Minimum confidence for a claim to count as verified (0-100)
    pub acceptance_threshold: u8,

    /// Results requested from each search backend per claim
    pub results_per_provider: usize,

    /// Points awarded per unique source
    pub points_per_source: u32,

    /// Cap on the points sources alone can earn
    pub source_points_cap: u32,

    /// Bonus when sources come from more than one backend
    pub multi_provider_bonus: u32,

    /// Bonus for claims marked high importance
    pub high_importance_bonus: u32,

    /// Penalty per snippet that disputes the claim
    pub contradiction_penalty: u32,

    /// HTTP timeout for a single search call (seconds)
    pub search_timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 60,
            results_per_provider: 5,
            points_per_source: 12,
            source_points_cap: 60,
            multi_provider_bonus: 20,
            high_importance_bonus: 20,
            contradiction_penalty: 25,
            search_timeout_secs: 10,
        }
    }
}

impl VerifierConfig {
    /// Search timeout as a Duration
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.acceptance_threshold > 100 {
            return Err(format!(
                "acceptance_threshold must be 0-100, got {}",
                self.acceptance_threshold
            ));
        }
        if self.results_per_provider == 0 {
            return Err("results_per_provider must be greater than 0".to_string());
        }
        if self.search_timeout_secs == 0 {
            return Err("search_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
