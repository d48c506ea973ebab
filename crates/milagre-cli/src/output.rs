//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use milagre_domain::{FactCheckResult, FactCheckStatus};
use milagre_factcheck::FactCheckData;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// The rendered report, with verdict and per-claim marks coloured.
    pub fn report(&self, data: &FactCheckData) -> String {
        data.report
            .lines()
            .map(|line| self.colorize_report_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The full payload as pretty JSON.
    pub fn json(&self, data: &FactCheckData) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// One-line summary of the verdict.
    pub fn verdict(&self, result: &FactCheckResult) -> String {
        let summary = format!(
            "{}: score {}/{}, {} of {} claim(s) verified",
            result.status.as_str(),
            result.score,
            result.threshold,
            result.verified_claims,
            result.total_claims
        );
        match result.status {
            FactCheckStatus::Passed => self.success(&summary),
            FactCheckStatus::Failed => self.error(&summary),
            FactCheckStatus::NoClaims => self.warning(&summary),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn colorize_report_line(&self, line: &str) -> String {
        if line.starts_with("Status: ✅") {
            self.colorize(line, "green")
        } else if line.starts_with("Status: ❌") {
            self.colorize(line, "red")
        } else if line.starts_with("   Status: ✅") {
            self.colorize(line, "cyan")
        } else if line.starts_with("   Status: ❌") {
            self.colorize(line, "magenta")
        } else {
            line.to_string()
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().bold().to_string(),
            "green" => text.green().bold().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
