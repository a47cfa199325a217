//! Model catalog — static mapping from model names to hosted providers.
//!
//! Every model the workflow may request must appear here; an unknown model
//! name is rejected before any HTTP call is made.

use serde::{Deserialize, Serialize};

use super::LlmError;

/// Hosted LLM vendor. Selected per call by resolving the requested model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    OpenAi,
    Google,
}

/// (model name, provider, display label shown to users picking a model).
pub const MODEL_CATALOG: &[(&str, Provider, &str)] = &[
    (
        "gemini-3-pro-preview",
        Provider::Google,
        "Gemini 3 Pro (Preview) - highest quality",
    ),
    (
        "gemini-3-flash-preview",
        Provider::Google,
        "Gemini 3 Flash (Preview) - fast responses",
    ),
    ("gemini-2.5-pro", Provider::Google, "Gemini 2.5 Pro - stable"),
    (
        "gemini-2.5-flash",
        Provider::Google,
        "Gemini 2.5 Flash - economical",
    ),
    (
        "gemini-2.5-flash-lite",
        Provider::Google,
        "Gemini 2.5 Flash Lite - fastest and cheapest",
    ),
    ("gpt-4.1", Provider::OpenAi, "GPT-4.1"),
    ("gpt-5", Provider::OpenAi, "GPT-5"),
];

/// Resolves the provider for a model name.
pub fn provider_for_model(model: &str) -> Result<Provider, LlmError> {
    MODEL_CATALOG
        .iter()
        .find(|(name, _, _)| *name == model)
        .map(|(_, provider, _)| *provider)
        .ok_or_else(|| LlmError::UnknownModel(model.to_string()))
}

/// Display label for a model, falling back to the raw name.
pub fn display_name(model: &str) -> &str {
    MODEL_CATALOG
        .iter()
        .find(|(name, _, _)| *name == model)
        .map(|(_, _, label)| *label)
        .unwrap_or(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_models_resolve_to_google() {
        assert_eq!(
            provider_for_model("gemini-2.5-flash").unwrap(),
            Provider::Google
        );
        assert_eq!(
            provider_for_model("gemini-3-pro-preview").unwrap(),
            Provider::Google
        );
    }

    #[test]
    fn test_gpt_models_resolve_to_openai() {
        assert_eq!(provider_for_model("gpt-4.1").unwrap(), Provider::OpenAi);
        assert_eq!(provider_for_model("gpt-5").unwrap(), Provider::OpenAi);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let err = provider_for_model("claude-sonnet-4-5").unwrap_err();
        assert!(matches!(err, LlmError::UnknownModel(_)));
    }

    #[test]
    fn test_display_name_falls_back_to_raw_name() {
        assert_eq!(display_name("some-future-model"), "some-future-model");
        assert!(display_name("gpt-4.1").contains("GPT-4.1"));
    }
}
