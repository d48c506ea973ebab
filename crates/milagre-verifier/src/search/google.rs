//! Google Custom Search JSON API

use super::{build_client, read_env, SearchProvider};
use crate::error::SearchError;
use async_trait::async_trait;
use milagre_domain::Source;
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: &str = "google";

/// Default Custom Search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// The API returns at most this many results per page
const MAX_RESULTS: usize = 10;

/// Google Custom Search backend
pub struct GoogleSearchProvider {
    endpoint: String,
    api_key: String,
    engine_id: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
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

impl GoogleSearchProvider {
    /// Create a provider for the given key and search engine id (`cx`)
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            client: build_client(Duration::from_secs(10)),
        }
    }

    /// Read `GOOGLE_SEARCH_API_KEY` and `GOOGLE_SEARCH_ENGINE_ID`
    pub fn from_env() -> Result<Self, SearchError> {
        let api_key = read_env("GOOGLE_SEARCH_API_KEY")?;
        let engine_id = read_env("GOOGLE_SEARCH_ENGINE_ID")?;
        Ok(Self::new(api_key, engine_id))
    }

    /// Point at a different endpoint (tests, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Source>, SearchError> {
        let num = limit.clamp(1, MAX_RESULTS).to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Http {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_default();
            return Err(SearchError::Status {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| SearchError::InvalidResponse {
            provider: PROVIDER.to_string(),
            message: e.to_string(),
        })?;

        Ok(body
            .items
            .into_iter()
            .take(limit)
            .map(|item| Source::new(item.link, item.title, item.snippet, PROVIDER))
            .collect())
    }
}
