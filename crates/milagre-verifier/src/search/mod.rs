//! Web search backends
//!
//! Every backend implements [`SearchProvider`]. [`MultiSearch`] fans a query
//! out to all configured backends at once and merges what comes back.

mod brave;
mod google;

pub use brave::BraveSearchProvider;
pub use google::GoogleSearchProvider;

use crate::error::SearchError;
use async_trait::async_trait;
use futures::future::join_all;
use milagre_domain::Source;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A web search backend
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short backend name, recorded on every [`Source`] it returns
    fn name(&self) -> &str;

    /// Run a query and return at most `limit` results
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Source>, SearchError>;
}

/// Backend returning canned results, for tests and offline runs
///
/// Queries are matched by substring; the longest matching fragment wins.
/// Unmatched queries get the default results.
#[derive(Debug, Clone, Default)]
pub struct StaticSearchProvider {
    name: String,
    default_results: Vec<Source>,
    responses: HashMap<String, Result<Vec<Source>, SearchError>>,
}

impl StaticSearchProvider {
    /// Create a provider with no results
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Results returned for unmatched queries
    pub fn with_default_results(mut self, results: Vec<Source>) -> Self {
        self.default_results = results;
        self
    }

    /// Results for queries containing `fragment`
    pub fn with_results(mut self, fragment: impl Into<String>, results: Vec<Source>) -> Self {
        self.responses.insert(fragment.into(), Ok(results));
        self
    }

    /// Fail queries containing `fragment`
    pub fn with_failure(mut self, fragment: impl Into<String>) -> Self {
        let error = SearchError::Status {
            provider: self.name.clone(),
            status: 503,
            message: "unavailable".to_string(),
        };
        self.responses.insert(fragment.into(), Err(error));
        self
    }

    /// Build `count` distinct sources attributed to `provider`
    pub fn sources(provider: &str, count: usize) -> Vec<Source> {
        (0..count)
            .map(|i| {
                Source::new(
                    format!("https://{}.example.com/article-{}", provider, i),
                    format!("{} result {}", provider, i),
                    "Reported by several outlets.",
                    provider,
                )
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Source>, SearchError> {
        let matched = self
            .responses
            .iter()
            .filter(|(fragment, _)| query.contains(fragment.as_str()))
            .max_by_key(|(fragment, _)| fragment.len())
            .map(|(_, response)| response.clone());

        let results = match matched {
            Some(response) => response?,
            None => self.default_results.clone(),
        };

        Ok(results
            .into_iter()
            .map(|source| Source {
                provider: self.name.clone(),
                ..source
            })
            .take(limit)
            .collect())
    }
}

/// Queries several backends concurrently and merges their results
#[derive(Clone)]
pub struct MultiSearch {
    providers: Vec<Arc<dyn SearchProvider>>,
    results_per_provider: usize,
}

impl MultiSearch {
    /// Create an empty fan-out with the given per-backend result count
    pub fn new(results_per_provider: usize) -> Self {
        Self {
            providers: Vec::new(),
            results_per_provider: results_per_provider.max(1),
        }
    }

    /// Add a backend
    pub fn with_provider(mut self, provider: impl SearchProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Configure Google and Brave from their environment variables
    ///
    /// Backends whose keys are missing are skipped with a log line.
    pub fn from_env(results_per_provider: usize, timeout: Duration) -> Self {
        let mut search = Self::new(results_per_provider);

        match GoogleSearchProvider::from_env() {
            Ok(google) => search = search.with_provider(google.with_timeout(timeout)),
            Err(e) => info!("Google search disabled: {}", e),
        }
        match BraveSearchProvider::from_env() {
            Ok(brave) => search = search.with_provider(brave.with_timeout(timeout)),
            Err(e) => info!("Brave search disabled: {}", e),
        }

        if search.is_empty() {
            warn!("No search backend configured; every claim will be unverified");
        }
        search
    }

    /// Names of the configured backends
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Whether no backend is configured
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Query every backend and merge the results
    ///
    /// Results keep backend order and are deduplicated by URL. Individual
    /// backend failures are logged and skipped; the call only fails when
    /// every backend failed.
    pub async fn search(&self, query: &str) -> Result<Vec<Source>, SearchError> {
        if self.providers.is_empty() {
            return Err(SearchError::NoProviders);
        }

        let calls = self
            .providers
            .iter()
            .map(|provider| provider.search(query, self.results_per_provider));
        let outcomes = join_all(calls).await;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        let mut failures = Vec::new();

        for (provider, outcome) in self.providers.iter().zip(outcomes) {
            match outcome {
                Ok(results) => {
                    debug!(provider = provider.name(), results = results.len(), "Search completed");
                    merged.extend(results.into_iter().filter(|s| seen.insert(s.url.clone())));
                }
                Err(e) => {
                    warn!(provider = provider.name(), "Search failed: {}", e);
                    failures.push(e.to_string());
                }
            }
        }

        if failures.len() == self.providers.len() {
            return Err(SearchError::AllFailed(failures));
        }
        Ok(merged)
    }
}

impl std::fmt::Debug for MultiSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSearch")
            .field("providers", &self.names())
            .field("results_per_provider", &self.results_per_provider)
            .finish()
    }
}

pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub(crate) fn read_env(name: &str) -> Result<String, SearchError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(SearchError::Config(format!("{} is empty", name))),
        Err(_) => Err(SearchError::Config(format!("{} is not set", name))),
    }
}
