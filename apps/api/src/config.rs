use anyhow::{Context, Result};

use crate::llm_client::catalog::Provider;

/// Application configuration loaded from environment variables.
///
/// Provider API keys are optional at startup: a provider with no key fails
/// at call time with a descriptive error, so the service can boot with only
/// one of the two vendors configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub default_model: String,
    pub max_tokens: u32,
    pub port: u16,
    pub rust_log: String,
    /// When true, guideline review responses include the issues/suggestions
    /// the reviewer computed instead of only the improved text.
    pub surface_guideline_review: bool,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            google_api_key: optional_env("GOOGLE_API_KEY"),
            default_model: std::env::var("DEFAULT_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            max_tokens: std::env::var("MAX_TOKENS")
                .unwrap_or_else(|_| "4000".to_string())
                .parse::<u32>()
                .context("MAX_TOKENS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            surface_guideline_review: bool_env("SURFACE_GUIDELINE_REVIEW"),
            debug: bool_env("DEBUG"),
        })
    }

    /// True if at least one provider has a key. Used only to warn at startup;
    /// individual calls still fail with the provider named.
    pub fn any_provider_configured(&self) -> bool {
        self.openai_api_key.is_some() || self.google_api_key.is_some()
    }

    pub fn provider_configured(&self, provider: Provider) -> bool {
        match provider {
            Provider::OpenAi => self.openai_api_key.is_some(),
            Provider::Google => self.google_api_key.is_some(),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn bool_env(key: &str) -> bool {
    matches!(
        std::env::var(key).unwrap_or_default().to_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
