//! Run options and pipeline configuration

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default article publication threshold
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Default number of claims checked per article
pub const DEFAULT_MAX_CLAIMS: usize = 10;

/// Upper bound on claims per article, whatever the caller asks for
pub const MAX_CLAIMS_LIMIT: usize = 50;

/// Per-run options supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckOptions {
    /// Minimum score to pass (0-100)
    pub threshold: u8,

    /// Maximum number of claims to verify (1-50)
    pub max_claims: usize,
}

impl Default for FactCheckOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_claims: DEFAULT_MAX_CLAIMS,
        }
    }
}

impl FactCheckOptions {
    /// Check ranges
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.threshold > 100 {
            return Err(PipelineError::InvalidOptions(format!(
                "threshold must be 0-100, got {}",
                self.threshold
            )));
        }
        if self.max_claims == 0 || self.max_claims > MAX_CLAIMS_LIMIT {
            return Err(PipelineError::InvalidOptions(format!(
                "max_claims must be 1-{}, got {}",
                MAX_CLAIMS_LIMIT, self.max_claims
            )));
        }
        Ok(())
    }
}

/// Pipeline configuration, the `[fact_check]` section of the service config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    /// Default publication threshold
    pub threshold: u8,

    /// Default claim bound
    pub max_claims: usize,

    /// Claims verified at the same time
    pub max_concurrency: usize,

    /// Budget for one claim's verification (seconds)
    pub verification_timeout_secs: u64,

    /// Budget for the whole verification phase (seconds)
    pub overall_timeout_secs: u64,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_claims: DEFAULT_MAX_CLAIMS,
            max_concurrency: 4,
            verification_timeout_secs: 15,
            overall_timeout_secs: 60,
        }
    }
}

impl FactCheckConfig {
    /// Per-claim timeout as a Duration
    pub fn verification_timeout(&self) -> Duration {
        Duration::from_secs(self.verification_timeout_secs)
    }

    /// Whole-run timeout as a Duration
    pub fn overall_timeout(&self) -> Duration {
        Duration::from_secs(self.overall_timeout_secs)
    }

    /// Options used when the caller supplies none
    pub fn default_options(&self) -> FactCheckOptions {
        FactCheckOptions {
            threshold: self.threshold,
            max_claims: self.max_claims,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.default_options().validate().map_err(|e| e.to_string())?;
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.verification_timeout_secs == 0 || self.overall_timeout_secs == 0 {
            return Err("timeouts must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
