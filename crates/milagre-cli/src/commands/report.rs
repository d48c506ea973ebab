//! Report command implementation.

use super::{print_result, read_article};
use crate::cli::{ReportArgs, RunArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use milagre_domain::traits::{ClaimExtractor, ClaimVerifier};
use milagre_factcheck::pipeline::build_from_env;
use milagre_factcheck::{parse_article, FactCheckData, FactCheckOptions, FactChecker};

/// Execute the report command in-process.
///
/// Claims come from sentence heuristics; verification uses whichever search
/// backends have API keys in the environment.
pub async fn execute_report(args: ReportArgs, formatter: &Formatter) -> Result<bool> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let checker = build_from_env(config.pipeline_settings());
    run_report(&checker, &args.run, formatter).await
}

/// Check one article file with an already-wired pipeline
pub(crate) async fn run_report<X, V>(
    checker: &FactChecker<X, V>,
    run: &RunArgs,
    formatter: &Formatter,
) -> Result<bool>
where
    X: ClaimExtractor + 'static,
    V: ClaimVerifier + 'static,
{
    let markdown = read_article(run)?;
    let article = parse_article(&markdown)?;

    let defaults = checker.config().default_options();
    let options = FactCheckOptions {
        threshold: run.threshold.unwrap_or(defaults.threshold),
        max_claims: run.max_claims.unwrap_or(defaults.max_claims),
    };

    let result = checker
        .fact_check_article(&article.body, &article.title, options)
        .await?;

    print_result(run, &FactCheckData::from(result), formatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use milagre_extractor::HeuristicExtractor;
    use milagre_factcheck::FactCheckConfig;
    use milagre_verifier::{MultiSearch, SearchVerifier, StaticSearchProvider, VerifierConfig};
    use std::io::Write;

    type StaticChecker = FactChecker<HeuristicExtractor, SearchVerifier>;

    /// Pipeline whose only search backend returns `results` sources per query
    fn static_checker(results: usize) -> StaticChecker {
        let search = MultiSearch::new(5).with_provider(
            StaticSearchProvider::new("static")
                .with_default_results(StaticSearchProvider::sources("static", results)),
        );
        FactChecker::new(
            HeuristicExtractor::default(),
            SearchVerifier::new(search, VerifierConfig::default()),
            FactCheckConfig::default(),
        )
    }

    fn run_args(file: &std::path::Path, threshold: Option<u8>, max_claims: Option<usize>) -> RunArgs {
        RunArgs {
            file: file.to_path_buf(),
            threshold,
            max_claims,
            json: true,
        }
    }

    fn article(markdown: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", markdown).unwrap();
        file
    }

    #[tokio::test]
    async fn test_well_sourced_article_passes() {
        let file = article("---\ntitle: Local\n---\n\nBitcoin launched in January 2009 with a 50 BTC reward.");

        let passed = run_report(&static_checker(5), &run_args(file.path(), None, None), &Formatter::new(false))
            .await
            .unwrap();
        assert!(passed);
    }

    #[tokio::test]
    async fn test_unsourced_article_fails_default_threshold() {
        let file = article("---\ntitle: Local\n---\n\nBitcoin launched in January 2009 with a 50 BTC reward.");

        let passed = run_report(&static_checker(0), &run_args(file.path(), None, None), &Formatter::new(false))
            .await
            .unwrap();
        assert!(!passed);
    }

    #[tokio::test]
    async fn test_threshold_override_applies() {
        let file = article("Bitcoin launched in January 2009 with a 50 BTC reward.");

        let passed = run_report(&static_checker(0), &run_args(file.path(), Some(0), None), &Formatter::new(false))
            .await
            .unwrap();
        assert!(passed);
    }

    #[tokio::test]
    async fn test_report_rejects_out_of_range_options() {
        let file = article("Bitcoin launched in January 2009 with a 50 BTC reward.");

        let result = run_report(&static_checker(5), &run_args(file.path(), Some(0), Some(0)), &Formatter::new(false)).await;
        assert!(matches!(result, Err(CliError::Pipeline(_))));
    }

    #[tokio::test]
    async fn test_report_missing_file() {
        let args = ReportArgs {
            run: run_args(std::path::Path::new("/nonexistent/post.md"), None, None),
            config: None,
        };
        let result = execute_report(args, &Formatter::new(false)).await;
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
