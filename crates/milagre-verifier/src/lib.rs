//! Milagre Verifier
//!
//! Checks individual claims against external evidence.
//!
//! The verifier provides:
//! - Web search backends (Google Custom Search, Brave) behind [`SearchProvider`]
//! - Concurrent multi-backend search with URL deduplication ([`MultiSearch`])
//! - Source-count confidence scoring ([`score_claim`])
//! - A search-backed verifier that never fails ([`SearchVerifier`])
//! - A model-judged verifier ([`LlmVerifier`])
//!
//! # Examples
//!
//! ```
//! use milagre_domain::traits::ClaimVerifier;
//! use milagre_domain::Claim;
//! use milagre_verifier::{MultiSearch, SearchVerifier, StaticSearchProvider, VerifierConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let search = MultiSearch::new(5).with_provider(
//!     StaticSearchProvider::new("static")
//!         .with_default_results(StaticSearchProvider::sources("static", 5)),
//! );
//! let verifier = SearchVerifier::new(search, VerifierConfig::default());
//!
//! let verification = verifier.verify(&Claim::new("Bitcoin launched in 2009.", 0)).await.unwrap();
//! assert!(verification.verified);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod llm_verifier;
mod scoring;
mod search;
mod verifier;

pub use config::VerifierConfig;
pub use error::{SearchError, VerificationError};
pub use llm_verifier::{LlmVerifier, Verdict, CONTRADICTED_CONFIDENCE_CAP};
pub use scoring::{contradicts, score_claim, ScoreBreakdown};
pub use search::{
    BraveSearchProvider, GoogleSearchProvider, MultiSearch, SearchProvider, StaticSearchProvider,
};
pub use verifier::{SearchVerifier, REASON_NO_SOURCES};
