use axum::{extract::State, Json};
use serde::Serialize;

use crate::llm_client::catalog::{display_name, Provider, MODEL_CATALOG};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub name: &'static str,
    pub provider: Provider,
    pub label: &'static str,
    /// False when the provider's API key is not configured.
    pub available: bool,
    /// True for the configured default model; pickers preselect it.
    pub default: bool,
}

/// GET /api/v1/models
/// Lists the model catalog for the client's model pickers.
pub async fn list_models_handler(State(state): State<AppState>) -> Json<Vec<ModelInfo>> {
    Json(
        MODEL_CATALOG
            .iter()
            .map(|&(name, provider, _)| ModelInfo {
                name,
                provider,
                label: display_name(name),
                available: state.config.provider_configured(provider),
                default: name == state.config.default_model,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::session::store::SessionStore;
    use crate::state::AppState;

    fn state_with_google_key_only(default_model: &str) -> AppState {
        AppState {
            sessions: SessionStore::new(),
            llm: LlmClient::new(None, Some("g-key".to_string()), 4000),
            config: Config {
                openai_api_key: None,
                google_api_key: Some("g-key".to_string()),
                default_model: default_model.to_string(),
                max_tokens: 4000,
                port: 8080,
                rust_log: "info".to_string(),
                surface_guideline_review: false,
                debug: false,
            },
        }
    }

    #[tokio::test]
    async fn test_list_models_marks_default_and_availability() {
        let state = state_with_google_key_only("gemini-2.5-flash");
        let Json(models) = list_models_handler(State(state)).await;

        let defaults: Vec<_> = models.iter().filter(|m| m.default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].name, "gemini-2.5-flash");

        assert!(models
            .iter()
            .filter(|m| m.provider == Provider::Google)
            .all(|m| m.available));
        assert!(models
            .iter()
            .filter(|m| m.provider == Provider::OpenAi)
            .all(|m| !m.available));
    }
}
