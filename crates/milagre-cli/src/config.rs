//! Pipeline settings for in-process runs.
//!
//! Reads the `[fact_check]`, `[verifier]` and `[extractor]` sections of a
//! service config file; everything else in the file is ignored.

use crate::error::{CliError, Result};
use milagre_extractor::ExtractorConfig;
use milagre_factcheck::pipeline::PipelineSettings;
use milagre_factcheck::FactCheckConfig;
use milagre_verifier::VerifierConfig;
use serde::Deserialize;
use std::path::Path;

/// Pipeline sections of a service config
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Orchestration defaults and timeouts
    pub fact_check: FactCheckConfig,
    /// Scoring and search limits
    pub verifier: VerifierConfig,
    /// Claim extraction
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.fact_check
            .validate()
            .and_then(|_| self.verifier.validate())
            .and_then(|_| self.extractor.validate())
            .map_err(CliError::Config)
    }

    /// Settings for an in-process run; extraction always uses heuristics
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            fact_check: self.fact_check.clone(),
            extractor: self.extractor.clone(),
            verifier: self.verifier.clone(),
            gemini_model: None,
            llm_verification: false,
        }
    }
}
