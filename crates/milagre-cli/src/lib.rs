//! Milagre CLI library.
//!
//! Command-line front end for the fact-check pipeline: `check` submits an
//! article to a running service, `report` runs the pipeline in-process.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use client::FactCheckClient;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

/// Exit code when the article failed its fact-check
pub const EXIT_FAILED: i32 = 2;

/// Run the parsed command, returning whether the article passed
pub async fn run(cli: Cli) -> Result<bool> {
    let formatter = Formatter::new(!cli.no_color);
    match cli.command {
        Command::Check(args) => commands::execute_check(args, &formatter).await,
        Command::Report(args) => commands::execute_report(args, &formatter).await,
    }
}
