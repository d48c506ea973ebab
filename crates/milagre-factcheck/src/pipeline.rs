//! Wiring the production pipeline from configuration and environment

use crate::options::FactCheckConfig;
use crate::orchestrator::FactChecker;
use async_trait::async_trait;
use milagre_domain::traits::{ClaimExtractor, ClaimVerifier, LlmProvider};
use milagre_domain::{Claim, Verification};
use milagre_extractor::{ExtractorConfig, ExtractorError, HeuristicExtractor, LlmClaimExtractor};
use milagre_llm::GeminiProvider;
use milagre_verifier::{LlmVerifier, MultiSearch, SearchVerifier, VerificationError, VerifierConfig};
use tracing::{info, warn};

/// The extractor chosen at startup
pub enum ArticleExtractor {
    /// Gemini-backed extraction (with the heuristic fallback if configured)
    Llm(LlmClaimExtractor<GeminiProvider>),
    /// Sentence heuristics only
    Heuristic(HeuristicExtractor),
}

#[async_trait]
impl ClaimExtractor for ArticleExtractor {
    type Error = ExtractorError;

    async fn extract(
        &self,
        title: &str,
        body: &str,
        max_claims: usize,
    ) -> Result<Vec<Claim>, ExtractorError> {
        match self {
            ArticleExtractor::Llm(extractor) => extractor.extract(title, body, max_claims).await,
            ArticleExtractor::Heuristic(extractor) => {
                extractor.extract(title, body, max_claims).await
            }
        }
    }
}

/// The verifier chosen at startup
pub enum ArticleVerifier {
    /// Source counting over the configured search backends
    Search(SearchVerifier),
    /// Verdicts from a search-grounded Gemini model
    Llm(LlmVerifier<GeminiProvider>),
}

#[async_trait]
impl ClaimVerifier for ArticleVerifier {
    type Error = VerificationError;

    async fn verify(&self, claim: &Claim) -> Result<Verification, VerificationError> {
        match self {
            ArticleVerifier::Search(verifier) => verifier.verify(claim).await,
            ArticleVerifier::Llm(verifier) => verifier.verify(claim).await,
        }
    }

    fn backends(&self) -> Vec<String> {
        match self {
            ArticleVerifier::Search(verifier) => verifier.backends(),
            ArticleVerifier::Llm(verifier) => verifier.backends(),
        }
    }
}

/// Configuration sections the pipeline is built from
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    /// Orchestration defaults and timeouts
    pub fact_check: FactCheckConfig,
    /// Claim extraction
    pub extractor: ExtractorConfig,
    /// Scoring and search limits
    pub verifier: VerifierConfig,
    /// Gemini model for extraction; `None` forces the heuristic extractor
    pub gemini_model: Option<String>,
    /// Ask the Gemini model for verdicts instead of counting search results
    pub llm_verification: bool,
}

/// The concrete fact checker used by the server and the CLI
pub type DefaultFactChecker = FactChecker<ArticleExtractor, ArticleVerifier>;

/// Pick the verifier for `settings`
///
/// Model verification needs both `llm_verification` and a usable Gemini
/// model; otherwise claims are checked against the search backends.
pub fn build_verifier(settings: &PipelineSettings) -> ArticleVerifier {
    if settings.llm_verification {
        match settings.gemini_model.as_deref().map(GeminiProvider::from_env) {
            Some(Ok(provider)) => {
                info!(model = provider.model_name(), "Using grounded Gemini verification");
                let provider = provider
                    .with_search_grounding(true)
                    .with_timeout(settings.verifier.search_timeout());
                return ArticleVerifier::Llm(LlmVerifier::new(
                    provider,
                    settings.verifier.acceptance_threshold,
                ));
            }
            Some(Err(e)) => warn!("Gemini unavailable ({}), verifying with search backends", e),
            None => warn!("llm_verification needs a gemini_model, verifying with search backends"),
        }
    }

    let search = MultiSearch::from_env(
        settings.verifier.results_per_provider,
        settings.verifier.search_timeout(),
    );
    ArticleVerifier::Search(SearchVerifier::new(search, settings.verifier.clone()))
}

/// Build the pipeline, reading API keys from the environment
///
/// Extraction uses Gemini when `GEMINI_API_KEY` is set and a model is
/// configured, and sentence heuristics otherwise. Verification follows
/// [`build_verifier`].
pub fn build_from_env(settings: PipelineSettings) -> DefaultFactChecker {
    let extractor = match settings.gemini_model.as_deref().map(GeminiProvider::from_env) {
        Some(Ok(provider)) => {
            info!(model = provider.model_name(), "Using Gemini claim extraction");
            ArticleExtractor::Llm(LlmClaimExtractor::new(provider, settings.extractor.clone()))
        }
        Some(Err(e)) => {
            info!("Gemini unavailable ({}), using heuristic claim extraction", e);
            ArticleExtractor::Heuristic(HeuristicExtractor::new(settings.extractor.min_sentence_words))
        }
        None => {
            info!("Using heuristic claim extraction");
            ArticleExtractor::Heuristic(HeuristicExtractor::new(settings.extractor.min_sentence_words))
        }
    };

    let verifier = build_verifier(&settings);

    FactChecker::new(extractor, verifier, settings.fact_check)
}
