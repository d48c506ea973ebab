//! Gemini Provider Implementation
//!
//! Talks to Google's `generateContent` REST endpoint. Optionally enables the
//! Google Search grounding tool so answers can cite web sources.
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini API
//! - Typed request/response schemas
//! - Retry logic with exponential backoff on transient failures
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use milagre_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("api-key", "gemini-2.5-flash")
//!     .with_search_grounding(true);
//! ```

use crate::LlmError;
use async_trait::async_trait;
use milagre_domain::traits::LlmProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
    temperature: f32,
    search_grounding: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Tool {
    google_search: EmptyObject,
}

#[derive(Serialize)]
struct EmptyObject {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Parsed `generateContent` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Candidate completions
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate completion
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    pub content: Option<CandidateContent>,
    /// Web sources used when grounding is enabled
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Content of a candidate
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    /// Content parts; text parts carry the answer
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// One content part
#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    /// Text, absent for non-text parts
    pub text: Option<String>,
}

/// Grounding information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Retrieved web chunks
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One grounding chunk
#[derive(Debug, Deserialize)]
pub struct GroundingChunk {
    /// Web reference
    pub web: Option<WebReference>,
}

/// A web page used for grounding
#[derive(Debug, Clone, Deserialize)]
pub struct WebReference {
    /// Page URI
    pub uri: String,
    /// Page title
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Web references of the first candidate
    pub fn web_references(&self) -> Vec<WebReference> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.iter().filter_map(|c| c.web.clone()).collect())
            .unwrap_or_default()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: Gemini API key
    /// - `model`: Model to use (e.g., "gemini-2.5-flash")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: 0.3,
            search_grounding: false,
        }
    }

    /// Create a provider from the `GEMINI_API_KEY` environment variable
    pub fn from_env(model: impl Into<String>) -> Result<Self, LlmError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| LlmError::Config(format!("{} is not set", API_KEY_ENV)))?;
        if key.trim().is_empty() {
            return Err(LlmError::Config(format!("{} is empty", API_KEY_ENV)));
        }
        Ok(Self::new(key, model))
    }

    /// Point at a different endpoint (tests, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Enable the Google Search grounding tool
    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    /// Call `generateContent` and return the parsed response
    ///
    /// Retries server errors and transport failures with exponential
    /// backoff; client errors are returned immediately.
    pub async fn generate_content(&self, prompt: &str) -> Result<GenerateResponse, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: if self.search_grounding {
                vec![Tool {
                    google_search: EmptyObject {},
                }]
            } else {
                Vec::new()
            },
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: 4096,
            },
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<GenerateResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        });
                    }

                    let message = response
                        .json::<ErrorEnvelope>()
                        .await
                        .map(|e| e.error.message)
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    }
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status.is_client_error() {
                        return Err(LlmError::Communication(format!("HTTP {}: {}", status, message)));
                    } else {
                        last_error = Some(LlmError::Communication(format!("HTTP {}: {}", status, message)));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(model = %self.model, attempt = attempts, "Gemini call failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let response = self.generate_content(prompt).await?;
        debug!(model = %self.model, sources = response.web_references().len(), "Gemini response received");
        response
            .text()
            .ok_or_else(|| LlmError::InvalidResponse("Response has no text content".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
