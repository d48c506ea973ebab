//! Fact-check orchestration
//!
//! extraction → bounded verification fan-out → aggregation → verdict

use crate::error::PipelineError;
use crate::options::{FactCheckConfig, FactCheckOptions};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use milagre_domain::traits::{ClaimExtractor, ClaimVerifier};
use milagre_domain::{Claim, FactCheckResult, RunId, Verification};
use std::sync::Arc;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

/// Object-safe entry point to the pipeline, for callers that should not
/// know which extractor and verifier are plugged in
#[async_trait]
pub trait FactCheckService: Send + Sync {
    /// Fact-check an article body
    async fn fact_check(
        &self,
        content: &str,
        title: &str,
        options: FactCheckOptions,
    ) -> Result<FactCheckResult, PipelineError>;

    /// Names of the search backends in use
    fn search_apis(&self) -> Vec<String>;

    /// Options applied when the caller supplies none
    fn default_options(&self) -> FactCheckOptions;
}

/// Runs the pipeline over a claim extractor and a claim verifier
pub struct FactChecker<X, V> {
    extractor: Arc<X>,
    verifier: Arc<V>,
    config: FactCheckConfig,
}

impl<X, V> FactChecker<X, V>
where
    X: ClaimExtractor + 'static,
    V: ClaimVerifier + 'static,
{
    /// Create a fact checker
    pub fn new(extractor: X, verifier: V, config: FactCheckConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            verifier: Arc::new(verifier),
            config,
        }
    }

    /// The pipeline configuration
    pub fn config(&self) -> &FactCheckConfig {
        &self.config
    }

    /// Fact-check an article
    ///
    /// `content` is the article body without frontmatter. Per-claim
    /// failures are folded into the result; only empty content, invalid
    /// options and extraction failure abort the run.
    pub async fn fact_check_article(
        &self,
        content: &str,
        title: &str,
        options: FactCheckOptions,
    ) -> Result<FactCheckResult, PipelineError> {
        options.validate()?;
        if content.trim().is_empty() {
            return Err(PipelineError::EmptyContent);
        }

        let run_id = RunId::new();
        info!(
            run_id = %run_id,
            title,
            threshold = options.threshold,
            max_claims = options.max_claims,
            "Fact-check started"
        );

        let mut claims = self
            .extractor
            .extract(title, content, options.max_claims)
            .await
            .map_err(|e| {
                warn!(run_id = %run_id, "Claim extraction failed: {}", e);
                PipelineError::Extraction(e.to_string())
            })?;
        claims.truncate(options.max_claims);

        debug!(run_id = %run_id, claims = claims.len(), "Claims extracted");

        let verifications = self.verify_all(claims).await;
        let result = FactCheckResult::aggregate(
            run_id,
            verifications,
            options.threshold,
            self.verifier.backends(),
            Utc::now(),
        );

        info!(
            run_id = %run_id,
            total = result.total_claims,
            verified = result.verified_claims,
            failed = result.failed_claims,
            score = result.score,
            threshold = result.threshold,
            status = result.status.as_str(),
            "Fact-check finished"
        );

        Ok(result)
    }

    /// Verify every claim with bounded concurrency, in claim order
    ///
    /// Claims still unresolved when the overall budget runs out are marked
    /// timed out; in-flight calls are dropped.
    async fn verify_all(&self, claims: Vec<Claim>) -> Vec<Verification> {
        let deadline = Instant::now() + self.config.overall_timeout();
        let per_call = self.config.verification_timeout();
        let verifier = self.verifier.as_ref();

        let mut slots: Vec<Option<Verification>> = vec![None; claims.len()];
        {
            let mut pending = stream::iter(claims.iter().cloned().enumerate())
                .map(|(idx, claim)| async move {
                    let outcome = match timeout(per_call, verifier.verify(&claim)).await {
                        Ok(Ok(verification)) => verification,
                        Ok(Err(e)) => {
                            warn!(position = claim.position, "Verification failed: {}", e);
                            Verification::unavailable(claim)
                        }
                        Err(_) => {
                            warn!(position = claim.position, "Verification timed out after {:?}", per_call);
                            Verification::unavailable(claim)
                        }
                    };
                    (idx, outcome)
                })
                .buffer_unordered(self.config.max_concurrency.max(1));

            loop {
                match timeout_at(deadline, pending.next()).await {
                    Ok(Some((idx, verification))) => slots[idx] = Some(verification),
                    Ok(None) => break,
                    Err(_) => {
                        let unresolved = slots.iter().filter(|s| s.is_none()).count();
                        warn!(unresolved, "Overall verification budget exhausted");
                        break;
                    }
                }
            }
        }

        slots
            .into_iter()
            .zip(claims)
            .map(|(slot, claim)| slot.unwrap_or_else(|| Verification::timed_out(claim)))
            .collect()
    }
}

#[async_trait]
impl<X, V> FactCheckService for FactChecker<X, V>
where
    X: ClaimExtractor + 'static,
    V: ClaimVerifier + 'static,
{
    async fn fact_check(
        &self,
        content: &str,
        title: &str,
        options: FactCheckOptions,
    ) -> Result<FactCheckResult, PipelineError> {
        self.fact_check_article(content, title, options).await
    }

    fn search_apis(&self) -> Vec<String> {
        self.verifier.backends()
    }

    fn default_options(&self) -> FactCheckOptions {
        self.config.default_options()
    }
}
