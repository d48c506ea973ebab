//! Evidence returned by an external search backend

use serde::{Deserialize, Serialize};

/// A single piece of evidence
///
/// Sources have no lifecycle of their own; they are embedded in the
/// [`Verification`](crate::Verification) that found them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Page URL
    pub url: String,

    /// Page title
    pub title: String,

    /// Excerpt the backend matched
    #[serde(default)]
    pub snippet: String,

    /// Backend that returned the source (e.g. "google", "brave")
    #[serde(default)]
    pub provider: String,
}

impl Source {
    /// Create a new source
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
            provider: provider.into(),
        }
    }
}
