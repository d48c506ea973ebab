//! Command implementations.

pub mod check;
pub mod report;

pub use self::check::execute_check;
pub use self::report::execute_report;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use milagre_factcheck::FactCheckData;

/// Read the article a command was pointed at
pub(crate) fn read_article(args: &RunArgs) -> Result<String> {
    let markdown = std::fs::read_to_string(&args.file)?;
    if markdown.trim().is_empty() {
        return Err(CliError::InvalidInput(format!(
            "{} is empty",
            args.file.display()
        )));
    }
    Ok(markdown)
}

/// Print the result the way the command asked, returning whether it passed
pub(crate) fn print_result(args: &RunArgs, data: &FactCheckData, formatter: &Formatter) -> Result<bool> {
    if args.json {
        println!("{}", formatter.json(data)?);
    } else {
        println!("{}", formatter.report(data));
        println!();
        println!("{}", formatter.verdict(&data.result));
    }
    Ok(data.result.passed)
}
