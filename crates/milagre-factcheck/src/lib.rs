//! Milagre Fact-Check
//!
//! Orchestrates a fact-check run over one article.
//!
//! # Architecture
//!
//! ```text
//! markdown → frontmatter → ClaimExtractor → [Claim]
//!                                              │ bounded fan-out
//!                                              ▼
//!                                        ClaimVerifier × N
//!                                              │ re-ordered
//!                                              ▼
//!                          FactCheckResult → generate_report
//! ```
//!
//! Runs are stateless; nothing is persisted. Per-claim failures degrade to
//! unverified outcomes, so a run only fails as a whole on empty content,
//! invalid options or an extraction failure with no fallback.
//!
//! # Example Usage
//!
//! ```
//! use milagre_extractor::HeuristicExtractor;
//! use milagre_factcheck::{generate_report, FactCheckConfig, FactCheckOptions, FactChecker};
//! use milagre_verifier::{MultiSearch, SearchVerifier, StaticSearchProvider, VerifierConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let search = MultiSearch::new(5).with_provider(
//!     StaticSearchProvider::new("static")
//!         .with_default_results(StaticSearchProvider::sources("static", 5)),
//! );
//! let checker = FactChecker::new(
//!     HeuristicExtractor::default(),
//!     SearchVerifier::new(search, VerifierConfig::default()),
//!     FactCheckConfig::default(),
//! );
//!
//! let result = checker
//!     .fact_check_article("Bitcoin launched in January 2009.", "History", FactCheckOptions::default())
//!     .await
//!     .unwrap();
//! assert!(result.passed);
//! println!("{}", generate_report(&result));
//! # }
//! ```

#![warn(missing_docs)]

mod error;
pub mod frontmatter;
mod options;
mod orchestrator;
pub mod pipeline;
mod report;

pub use error::PipelineError;
pub use frontmatter::{parse_article, ParsedArticle};
pub use options::{
    FactCheckConfig, FactCheckOptions, DEFAULT_MAX_CLAIMS, DEFAULT_THRESHOLD, MAX_CLAIMS_LIMIT,
};
pub use orchestrator::{FactCheckService, FactChecker};
pub use report::{generate_report, FactCheckData};
