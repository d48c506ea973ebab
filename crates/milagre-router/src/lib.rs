//! Milagre Router
//!
//! HTTP front end of the fact-check pipeline: `POST /fact-check` behind a
//! per-caller fixed-window rate limit, plus `GET /health`.
//!
//! Callers are identified by a bearer session token when one validates and by
//! client IP otherwise. Rate-limit counters live in the process; several
//! instances only share them through a shared [`rate_limit::RateLimitStore`].

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod rate_limit;
pub mod session;

use config::ServiceConfig;
use handlers::{create_router, AppState};
use milagre_factcheck::pipeline::build_from_env;
use milagre_factcheck::FactCheckService;
use rate_limit::RateLimiter;
use session::SessionManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build application state for a config and an already-wired pipeline
pub fn app_state(config: &ServiceConfig, service: Arc<dyn FactCheckService>) -> AppState {
    AppState {
        service,
        rate_limiter: Arc::new(RateLimiter::in_memory()),
        session_manager: Arc::new(SessionManager::new(&config.jwt_secret)),
        rate_limit: config.rate_limit,
    }
}

/// Start the HTTP server
///
/// Wires the pipeline from the config and the environment's API keys, then
/// serves until Ctrl-C.
pub async fn start_server(config: ServiceConfig) -> Result<(), RouterError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed by an embedding binary
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    config.validate().map_err(config::ConfigError::Invalid)?;

    info!("Starting Milagre fact-check service");
    info!("Bind address: {}", config.bind_addr());
    info!(
        "Rate limit: {} requests per {} seconds",
        config.rate_limit.limit, config.rate_limit.window_secs
    );

    let checker = build_from_env(config.pipeline_settings());
    let service: Arc<dyn FactCheckService> = Arc::new(checker);
    let search_apis = service.search_apis();
    if search_apis.is_empty() {
        info!("No search backends configured; every claim will be unverified");
    } else {
        info!("Search backends: {}", search_apis.join(", "));
    }

    let app = create_router(app_state(&config, service));

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RouterError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_from_config() {
        let mut config = ServiceConfig::default_test_config();
        config.providers.gemini_model = None;
        let service: Arc<dyn FactCheckService> =
            Arc::new(build_from_env(config.pipeline_settings()));

        let state = app_state(&config, service);
        assert_eq!(state.rate_limit.limit, 10);
        assert_eq!(state.rate_limiter.stats().total_entries, 0);
    }
}
