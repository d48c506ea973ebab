//! Milagre Router server
//!
//! Starts the fact-check HTTP service.

use milagre_router::{config::ServiceConfig, start_server, RouterError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), RouterError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServiceConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: milagre-router --config <path-to-config.toml>");
        eprintln!();
        ServiceConfig::default_test_config()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Milagre Router - Article fact-check service");
    println!();
    println!("USAGE:");
    println!("    milagre-router --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    milagre-router --config config/router.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address, bind_port: where to listen");
    println!("    - jwt_secret: secret for validating bearer session tokens");
    println!("    - [rate_limit] limit, window_secs: per-caller fixed window");
    println!("    - [fact_check], [verifier], [extractor], [providers]: pipeline tuning");
    println!();
    println!("ENVIRONMENT:");
    println!("    GEMINI_API_KEY                                  Claim extraction model");
    println!("    GOOGLE_SEARCH_API_KEY, GOOGLE_SEARCH_ENGINE_ID  Google Custom Search");
    println!("    BRAVE_SEARCH_API_KEY                            Brave Search");
    println!("    RUST_LOG                                        Log filter (default: info)");
    println!();
}
