//! Milagre Domain Layer
//!
//! Core data model and business rules for the fact-checking pipeline.
//! Infrastructure (LLM providers, search backends, HTTP) lives in other
//! crates and plugs in through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Claim**: a single factual assertion extracted from generated text
//! - **Source**: evidence returned by an external search backend
//! - **Verification**: the outcome of checking one claim against sources
//! - **FactCheckResult**: the aggregate verdict for one article
//!
//! ## Invariants
//!
//! - `verified_claims + failed_claims == total_claims`
//! - `score` is a pure function of the verification outcomes
//! - `passed == (score >= threshold)`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod fact_check;
pub mod source;
pub mod traits;
pub mod verification;

// Re-exports for convenience
pub use claim::{finalize_claims, Claim, Importance, RunId};
pub use fact_check::{compute_score, FactCheckResult, FactCheckStatus};
pub use source::Source;
pub use verification::{Verification, MAX_CONFIDENCE};
