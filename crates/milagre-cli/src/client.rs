//! HTTP client for the fact-check service.

use crate::error::{CliError, Result};
use milagre_factcheck::FactCheckData;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request timeout; a run may verify up to fifty claims
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FactCheckRequest<'a> {
    markdown: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_claims: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct FactCheckResponse {
    data: FactCheckData,
}

#[derive(Debug, Deserialize)]
struct FieldDetail {
    field: String,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: Vec<FieldDetail>,
    #[serde(default)]
    retry_after: Option<u64>,
}

/// Client for `POST /fact-check`
pub struct FactCheckClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl FactCheckClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CliError::Connection(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Submit an article and return the result with its report
    pub async fn fact_check(
        &self,
        markdown: &str,
        threshold: Option<u8>,
        max_claims: Option<usize>,
    ) -> Result<FactCheckData> {
        let url = format!("{}/fact-check", self.base_url);
        debug!(url = %url, "Submitting article");

        let mut request = self.http.post(&url).json(&FactCheckRequest {
            markdown,
            threshold,
            max_claims,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let body: FactCheckResponse = response.json().await?;
            return Ok(body.data);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&text).ok();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = body.and_then(|b| b.retry_after).unwrap_or(0);
            return Err(CliError::RateLimited { retry_after });
        }

        let message = match body {
            Some(body) if !body.details.is_empty() => {
                let details: Vec<String> = body
                    .details
                    .iter()
                    .map(|d| format!("{}: {}", d.field, d.message))
                    .collect();
                format!("{} ({})", body.error, details.join("; "))
            }
            Some(body) if !body.error.is_empty() => body.error,
            _ => text,
        };
        Err(CliError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
