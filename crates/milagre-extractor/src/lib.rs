//! Milagre Extractor
//!
//! Turns a generated article into a bounded, ordered list of factual claims.
//!
//! # Architecture
//!
//! ```text
//! Article → LlmClaimExtractor → LLM → JSON → Claims
//!                 │ (on failure)
//!                 └──────→ HeuristicExtractor → Claims
//! ```
//!
//! Both strategies implement [`milagre_domain::traits::ClaimExtractor`], so the
//! orchestrator does not care which one it runs.
//!
//! # Example Usage
//!
//! ```
//! use milagre_domain::traits::ClaimExtractor;
//! use milagre_extractor::{ExtractorConfig, LlmClaimExtractor};
//! use milagre_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let llm = MockProvider::new(r#"[{"text": "Bitcoin launched in 2009."}]"#);
//! let extractor = LlmClaimExtractor::new(llm, ExtractorConfig::default());
//!
//! let claims = extractor
//!     .extract("History", "Bitcoin launched in 2009.", 10)
//!     .await
//!     .unwrap();
//! assert_eq!(claims.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
pub mod sentences;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::{HeuristicExtractor, LlmClaimExtractor};
pub use parser::parse_llm_response;
pub use prompt::PromptBuilder;
