//! Brave Web Search API

use super::{build_client, read_env, SearchProvider};
use crate::error::SearchError;
use async_trait::async_trait;
use milagre_domain::Source;
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: &str = "brave";

/// Default Brave web search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

const MAX_RESULTS: usize = 20;

/// Brave Search backend
pub struct BraveSearchProvider {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

impl BraveSearchProvider {
    /// Create a provider with a subscription token
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(10)),
        }
    }

    /// Read `BRAVE_SEARCH_API_KEY`
    pub fn from_env() -> Result<Self, SearchError> {
        Ok(Self::new(read_env("BRAVE_SEARCH_API_KEY")?))
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
impl SearchProvider for BraveSearchProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Source>, SearchError> {
        let count = limit.clamp(1, MAX_RESULTS).to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", self.api_key.as_str())
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::Http {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
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
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .map(|r| Source::new(r.url, strip_tags(&r.title), strip_tags(&r.description), PROVIDER))
            .collect())
    }
}

/// Brave highlights matches with inline `<strong>` tags
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
