//! Parse LLM output into claims

use crate::error::ExtractorError;
use milagre_domain::{Claim, Importance};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// One claim as the model is asked to emit it
#[derive(Debug, Deserialize)]
struct RawClaim {
    text: String,
    #[serde(default, alias = "searchQuery")]
    search_query: Option<String>,
    #[serde(default)]
    importance: Option<String>,
}

/// Parse an LLM JSON response into claims, in the order the model gave them
///
/// Malformed entries are skipped with a warning; a response that is not a
/// JSON array (or an object with a `claims` array) is an error.
pub fn parse_llm_response(response: &str) -> Result<Vec<Claim>, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let items = match &json {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("claims")
            .and_then(Value::as_array)
            .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON array".to_string()))?,
        _ => return Err(ExtractorError::InvalidFormat("Expected JSON array".to_string())),
    };

    let mut claims = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match parse_claim(item) {
            Ok(raw) if raw.text.trim().is_empty() => {
                warn!("Claim {} has empty text, skipping", idx);
            }
            Ok(raw) => {
                let position = claims.len();
                let importance = raw
                    .importance
                    .as_deref()
                    .map(Importance::parse)
                    .unwrap_or_default();
                let mut claim = Claim::new(raw.text.trim(), position).with_importance(importance);
                if let Some(query) = raw.search_query {
                    claim = claim.with_search_query(query.trim());
                }
                claims.push(claim);
            }
            Err(e) => {
                warn!("Failed to parse claim {}: {}", idx, e);
            }
        }
    }

    Ok(claims)
}

fn parse_claim(item: &Value) -> Result<RawClaim, String> {
    match item {
        // Some models return bare strings instead of objects
        Value::String(text) => Ok(RawClaim {
            text: text.clone(),
            search_query: None,
            importance: None,
        }),
        Value::Object(_) => RawClaim::deserialize(item).map_err(|e| e.to_string()),
        _ => Err("Claim is not a JSON object".to_string()),
    }
}

/// Extract JSON from a response, handling markdown code fences and chatter
/// around the payload
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }
        // Skip the opening fence, and the closing one if present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        return Ok(lines[1..end].join("\n"));
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    // Prose around the payload: take the outermost array
    match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => Ok(trimmed[start..=end].to_string()),
        _ => Err(ExtractorError::InvalidFormat(
            "No JSON payload in response".to_string(),
        )),
    }
}
