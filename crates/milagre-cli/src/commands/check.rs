//! Check command implementation.

use super::{print_result, read_article};
use crate::cli::CheckArgs;
use crate::client::FactCheckClient;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the check command against a running service.
pub async fn execute_check(args: CheckArgs, formatter: &Formatter) -> Result<bool> {
    let markdown = read_article(&args.run)?;

    let client = FactCheckClient::new(&args.server, args.token)?;
    let data = client
        .fact_check(&markdown, args.run.threshold, args.run.max_claims)
        .await?;

    print_result(&args.run, &data, formatter)
}
