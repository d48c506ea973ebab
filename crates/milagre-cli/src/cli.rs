//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default fact-check service address
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

/// Milagre CLI - Fact-check markdown articles.
#[derive(Debug, Parser)]
#[command(name = "milagre")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fact-check a file through a running fact-check service
    Check(CheckArgs),

    /// Fact-check a file in-process and print the report
    Report(ReportArgs),
}

/// Options shared by both commands.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Markdown file to check
    pub file: PathBuf,

    /// Minimum score to pass (0-100)
    #[arg(short, long)]
    pub threshold: Option<u8>,

    /// Maximum number of claims to verify (1-50)
    #[arg(short = 'm', long)]
    pub max_claims: Option<usize>,

    /// Print the JSON payload instead of the report
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Fact-check service URL
    #[arg(short, long, env = "MILAGRE_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Bearer session token
    #[arg(long, env = "MILAGRE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Service configuration file to take pipeline settings from
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
