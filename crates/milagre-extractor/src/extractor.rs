//! Claim extraction strategies

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use crate::sentences::{importance_of, is_factual, split_sentences, strip_markdown};
use async_trait::async_trait;
use milagre_domain::traits::{ClaimExtractor, LlmProvider};
use milagre_domain::{finalize_claims, Claim};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Extracts claims with sentence heuristics, no model involved
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    min_sentence_words: usize,
}

impl HeuristicExtractor {
    /// Create a heuristic extractor with the given minimum sentence length
    pub fn new(min_sentence_words: usize) -> Self {
        Self {
            min_sentence_words: min_sentence_words.max(1),
        }
    }

    /// Synchronous core, shared with the LLM fallback path
    pub fn extract_sync(&self, body: &str, max_claims: usize) -> Vec<Claim> {
        let prose = strip_markdown(body);
        let candidates = split_sentences(&prose)
            .into_iter()
            .filter(|s| is_factual(s, self.min_sentence_words))
            .enumerate()
            .map(|(position, sentence)| {
                let importance = importance_of(&sentence);
                Claim::new(sentence, position).with_importance(importance)
            })
            .collect();

        finalize_claims(candidates, max_claims)
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default().min_sentence_words)
    }
}

#[async_trait]
impl ClaimExtractor for HeuristicExtractor {
    type Error = ExtractorError;

    async fn extract(
        &self,
        _title: &str,
        body: &str,
        max_claims: usize,
    ) -> Result<Vec<Claim>, ExtractorError> {
        if body.trim().is_empty() {
            return Err(ExtractorError::EmptyInput);
        }
        let claims = self.extract_sync(body, max_claims);
        debug!("Heuristic extraction produced {} claims", claims.len());
        Ok(claims)
    }
}

/// Extracts claims by prompting a text model
///
/// When configured with `heuristic_fallback`, model failures (transport
/// errors, timeouts, unparseable output) fall back to [`HeuristicExtractor`]
/// instead of failing the run.
pub struct LlmClaimExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    fallback: Option<HeuristicExtractor>,
}

impl<L> LlmClaimExtractor<L>
where
    L: LlmProvider + 'static,
{
    /// Create an extractor; the fallback follows `config.heuristic_fallback`
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self::from_arc(Arc::new(llm_provider), config)
    }

    /// Create an extractor sharing an existing provider
    pub fn from_arc(llm_provider: Arc<L>, config: ExtractorConfig) -> Self {
        let fallback = config
            .heuristic_fallback
            .then(|| HeuristicExtractor::new(config.min_sentence_words));
        Self {
            llm_provider,
            config,
            fallback,
        }
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    async fn extract_with_model(
        &self,
        title: &str,
        body: &str,
        max_claims: usize,
    ) -> Result<Vec<Claim>, ExtractorError> {
        let body = truncate(body, self.config.max_text_length);
        let prompt = PromptBuilder::new(title, body)
            .with_max_claims(max_claims)
            .build();

        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate(&prompt),
        )
        .await
        .map_err(|_| ExtractorError::Timeout)?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", response.len());

        parse_llm_response(&response)
    }
}

#[async_trait]
impl<L> ClaimExtractor for LlmClaimExtractor<L>
where
    L: LlmProvider + 'static,
{
    type Error = ExtractorError;

    async fn extract(
        &self,
        title: &str,
        body: &str,
        max_claims: usize,
    ) -> Result<Vec<Claim>, ExtractorError> {
        if body.trim().is_empty() {
            return Err(ExtractorError::EmptyInput);
        }
        if max_claims == 0 {
            return Ok(Vec::new());
        }

        info!(
            "Extracting claims with model '{}', body length {}",
            self.model_name(),
            body.len()
        );

        match self.extract_with_model(title, body, max_claims).await {
            Ok(candidates) => {
                let claims = finalize_claims(candidates, max_claims);
                info!("Extracted {} claims", claims.len());
                Ok(claims)
            }
            Err(e) => match &self.fallback {
                Some(heuristic) => {
                    warn!("Model extraction failed ({}), using sentence heuristics", e);
                    Ok(heuristic.extract_sync(body, max_claims))
                }
                None => Err(e),
            },
        }
    }
}

/// Cut `text` to at most `max_len` bytes without splitting a character
fn truncate(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    warn!(
        "Article body truncated from {} to {} bytes before extraction",
        text.len(),
        end
    );
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use milagre_domain::Importance;
    use milagre_llm::MockProvider;
    use std::time::Duration;

    const ARTICLE: &str = "# Bitcoin news\n\n\
        Bitcoin reached $100,000 in December 2024. \
        I think this is amazing news for everyone. \
        The SEC approved spot ETFs in January 2024.\n\n\
        Will it go higher?\n";

    fn no_fallback() -> ExtractorConfig {
        ExtractorConfig {
            heuristic_fallback: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_heuristic_extraction() {
        let claims = HeuristicExtractor::default()
            .extract("Bitcoin news", ARTICLE, 10)
            .await
            .unwrap();

        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].text, "Bitcoin reached $100,000 in December 2024.");
        assert_eq!(claims[0].importance, Importance::High);
        assert_eq!(claims[1].position, 1);
    }

    #[tokio::test]
    async fn test_heuristic_respects_bound() {
        let claims = HeuristicExtractor::default()
            .extract("t", ARTICLE, 1)
            .await
            .unwrap();
        assert_eq!(claims.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_is_error() {
        let result = HeuristicExtractor::default().extract("t", "  \n ", 10).await;
        assert!(matches!(result, Err(ExtractorError::EmptyInput)));

        let extractor = LlmClaimExtractor::new(MockProvider::new("[]"), no_fallback());
        let result = extractor.extract("t", "", 10).await;
        assert!(matches!(result, Err(ExtractorError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_llm_extraction_dedupes_and_bounds() {
        let response = r#"[
            {"text": "A happened in 2020.", "importance": "high"},
            {"text": "a  happened in 2020."},
            {"text": "B happened in 2021."},
            {"text": "C happened in 2022."}
        ]"#;
        let extractor = LlmClaimExtractor::new(MockProvider::new(response), no_fallback());

        let claims = extractor.extract("t", "body", 2).await.unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].text, "A happened in 2020.");
        assert_eq!(claims[1].text, "B happened in 2021.");
        assert_eq!(claims[1].position, 1);
    }

    #[tokio::test]
    async fn test_zero_max_claims_skips_model() {
        let llm = MockProvider::new("[]");
        let extractor = LlmClaimExtractor::new(llm.clone(), no_fallback());

        let claims = extractor.extract("t", "body", 0).await.unwrap();
        assert!(claims.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_error_without_fallback() {
        let mut llm = MockProvider::new("[]");
        llm.add_error("Article title");
        let extractor = LlmClaimExtractor::new(llm, no_fallback());

        let result = extractor.extract("t", ARTICLE, 10).await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }

    #[tokio::test]
    async fn test_llm_error_falls_back_to_heuristics() {
        let mut llm = MockProvider::new("[]");
        llm.add_error("Article title");
        let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());

        let claims = extractor.extract("t", ARTICLE, 10).await.unwrap();
        assert_eq!(claims.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_output_falls_back() {
        let extractor = LlmClaimExtractor::new(
            MockProvider::new("Sorry, I cannot help with that."),
            ExtractorConfig::default(),
        );
        let claims = extractor.extract("t", ARTICLE, 10).await.unwrap();
        assert_eq!(claims.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let llm = MockProvider::new("[]").with_delay(Duration::from_secs(120));
        let config = ExtractorConfig {
            extraction_timeout_secs: 1,
            heuristic_fallback: false,
            ..Default::default()
        };
        let extractor = LlmClaimExtractor::new(llm, config);

        let result = extractor.extract("t", "body", 5).await;
        assert!(matches!(result, Err(ExtractorError::Timeout)));
    }

    #[tokio::test]
    async fn test_long_body_is_truncated_in_prompt() {
        let mut llm = MockProvider::new("[]");
        llm.add_response("TAIL-MARKER", r#"[{"text": "should not be seen"}]"#);
        let config = ExtractorConfig {
            max_text_length: 100,
            heuristic_fallback: false,
            ..Default::default()
        };
        let extractor = LlmClaimExtractor::new(llm, config);

        let body = format!("{}TAIL-MARKER", "x".repeat(200));
        let claims = extractor.extract("t", &body, 5).await.unwrap();
        assert!(claims.is_empty());
    }

    #[test]
    fn test_truncate_char_boundary() {
        let text = "ação";
        // 'ç' spans bytes 1..3
        assert_eq!(truncate(text, 2), "a");
        assert_eq!(truncate(text, 100), text);
    }
}
