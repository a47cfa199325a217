mod config;
mod drafting;
mod errors;
mod guideline;
mod llm_client;
mod research;
mod review;
mod routes;
mod scrape;
mod session;
mod state;
mod strategy;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_directive(&config))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Epistle API v{}", env!("CARGO_PKG_VERSION"));

    if !config.any_provider_configured() {
        warn!("No provider API key configured; every LLM call will fail until one is set");
    }

    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.google_api_key.clone(),
        config.max_tokens,
    );
    info!("LLM client initialized (default model: {})", config.default_model);

    let state = AppState {
        sessions: SessionStore::new(),
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Default filter when RUST_LOG is unset. Tracing targets use the crate's
/// module path, which replaces hyphens in the package name with underscores,
/// so the directive must be normalized the same way to match.
fn default_log_directive(config: &Config) -> String {
    let level = if config.debug { "debug" } else { config.rust_log.as_str() };
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            openai_api_key: None,
            google_api_key: None,
            default_model: "gemini-2.5-flash".to_string(),
            max_tokens: 4000,
            port: 8080,
            rust_log: "info".to_string(),
            surface_guideline_review: false,
            debug: false,
        }
    }

    #[test]
    fn test_default_log_directive_matches_module_targets() {
        let config = test_config();
        assert_eq!(default_log_directive(&config), "epistle_api=info");
        assert!(!default_log_directive(&config).contains('-'));
    }

    #[test]
    fn test_debug_flag_forces_debug_level() {
        let mut config = test_config();
        config.debug = true;
        assert_eq!(default_log_directive(&config), "epistle_api=debug");
    }
}
