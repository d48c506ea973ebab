//! Configuration file parsing for the fact-check service.
//!
//! Loads bind settings, the JWT secret, rate limits and the pipeline sections
//! from TOML. API keys are read from the environment, never from this file.

use milagre_extractor::ExtractorConfig;
use milagre_factcheck::pipeline::PipelineSettings;
use milagre_factcheck::FactCheckConfig;
use milagre_verifier::VerifierConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Service configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A section failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Service configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// Secret for verifying bearer session tokens
    pub jwt_secret: String,

    /// Fixed-window limit on `POST /fact-check`
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Orchestration defaults and timeouts
    #[serde(default)]
    pub fact_check: FactCheckConfig,

    /// Scoring and search limits
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Claim extraction
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Model selection
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Requests allowed per caller per window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests per window
    pub limit: u32,

    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Window length in milliseconds
    pub fn window_ms(&self) -> u64 {
        self.window_secs.saturating_mul(1000)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            window_secs: 60,
        }
    }
}

/// Upstream model selection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Gemini model for claim extraction; unset means sentence heuristics
    pub gemini_model: Option<String>,

    /// Verify claims with the search-grounded Gemini model instead of
    /// counting search results
    pub llm_verification: bool,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            gemini_model: Some("gemini-2.5-flash".to_string()),
            llm_verification: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&contents)?;

        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingField("jwt_secret".to_string()));
        }
        config.validate().map_err(ConfigError::Invalid)?;

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServiceConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            jwt_secret: "test-secret-key-do-not-use-in-production".to_string(),
            rate_limit: RateLimitConfig::default(),
            fact_check: FactCheckConfig::default(),
            verifier: VerifierConfig::default(),
            extractor: ExtractorConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        if self.rate_limit.limit == 0 {
            return Err("rate_limit.limit must be greater than 0".to_string());
        }
        if self.rate_limit.window_secs == 0 {
            return Err("rate_limit.window_secs must be greater than 0".to_string());
        }
        self.fact_check.validate().map_err(|e| format!("fact_check: {}", e))?;
        self.verifier.validate().map_err(|e| format!("verifier: {}", e))?;
        self.extractor.validate().map_err(|e| format!("extractor: {}", e))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// The sections the pipeline is built from
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            fact_check: self.fact_check.clone(),
            extractor: self.extractor.clone(),
            verifier: self.verifier.clone(),
            gemini_model: self.providers.gemini_model.clone(),
            llm_verification: self.providers.llm_verification,
        }
    }
}
