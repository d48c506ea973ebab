//! Human-readable fact-check report

use milagre_domain::FactCheckResult;
use serde::{Deserialize, Serialize};

const RULE_WIDTH: usize = 60;

/// A result plus its rendered report, as returned over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckData {
    /// The aggregate result, flattened into the same JSON object
    #[serde(flatten)]
    pub result: FactCheckResult,

    /// Output of [`generate_report`]
    pub report: String,
}

impl From<FactCheckResult> for FactCheckData {
    fn from(result: FactCheckResult) -> Self {
        let report = generate_report(&result);
        Self { result, report }
    }
}

/// Render a plain-text report: verdict header, counts, then one entry per claim
pub fn generate_report(result: &FactCheckResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone(), "FACT-CHECK REPORT".to_string(), rule.clone(), String::new()];

    let verdict = if result.passed { "✅ PASSED" } else { "❌ FAILED" };
    let apis = if result.search_apis_used.is_empty() {
        "none".to_string()
    } else {
        result.search_apis_used.join(", ")
    };
    lines.push(format!("Status: {} ({})", verdict, result.status.as_str()));
    lines.push(format!("Score: {}/{}", result.score, result.threshold));
    lines.push(format!("Date: {}", result.checked_at.format("%Y-%m-%d %H:%M:%S UTC")));
    lines.push(format!("Search APIs: {}", apis));
    lines.push(format!("Run: {}", result.run_id));
    lines.push(String::new());

    lines.push(format!("Claims analysed: {}", result.total_claims));
    lines.push(format!("✅ Verified: {}", result.verified_claims));
    lines.push(format!("❌ Not verified: {}", result.failed_claims));

    if !result.verifications.is_empty() {
        lines.push(String::new());
        lines.push("CLAIM DETAILS:".to_string());
        lines.push("-".repeat(RULE_WIDTH));

        for (index, v) in result.verifications.iter().enumerate() {
            let mark = if v.verified { "✅" } else { "❌" };
            lines.push(String::new());
            lines.push(format!("{}. {}", index + 1, v.claim.text));
            lines.push(format!("   Status: {} | Confidence: {}%", mark, v.confidence));
            lines.push(format!("   Sources: {}", v.sources.len()));
            lines.push(format!("   Reasoning: {}", v.reasoning));
        }
    }

    lines.push(String::new());
    lines.push(rule);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use milagre_domain::{Claim, RunId, Source, Verification};

    fn sample() -> FactCheckResult {
        let verifications = vec![
            Verification::scored(
                Claim::new("Bitcoin launched in 2009.", 0),
                80,
                60,
                vec![Source::new("https://a.example.com", "A", "", "google")],
                "verified with 1 source(s) from 1 provider(s)",
            ),
            Verification::unavailable(Claim::new("ETH flipped BTC.", 1)),
        ];
        let checked_at = chrono::Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        FactCheckResult::aggregate(RunId::new(), verifications, 70, vec!["google".to_string()], checked_at)
    }

    #[test]
    fn test_report_sections() {
        let report = generate_report(&sample());

        assert!(report.starts_with(&"=".repeat(60)));
        assert!(report.contains("Status: ❌ FAILED (failed)"));
        assert!(report.contains("Score: 50/70"));
        assert!(report.contains("Date: 2025-01-02 03:04:05 UTC"));
        assert!(report.contains("Search APIs: google"));
        assert!(report.contains("Claims analysed: 2"));
        assert!(report.contains("1. Bitcoin launched in 2009."));
        assert!(report.contains("   Status: ✅ | Confidence: 80%"));
        assert!(report.contains("2. ETH flipped BTC."));
        assert!(report.contains("Reasoning: verification unavailable"));
    }

    #[test]
    fn test_report_without_claims() {
        let mut result = sample();
        result.verifications.clear();
        result.search_apis_used.clear();
        let report = generate_report(&result);
        assert!(!report.contains("CLAIM DETAILS"));
        assert!(report.contains("Search APIs: none"));
    }

    #[test]
    fn test_data_flattens_result() {
        let data = FactCheckData::from(sample());
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["score"], 50);
        assert_eq!(json["totalClaims"], 2);
        assert_eq!(json["status"], "failed");
        assert!(json["report"].as_str().unwrap().contains("FACT-CHECK REPORT"));
    }
}
