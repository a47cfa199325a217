/// LLM Client — the single point of entry for all hosted-model calls in Epistle.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through this module.
///
/// Two vendors are supported (OpenAI chat-completions and Google Gemini
/// generateContent); the vendor is resolved per call from the requested
/// model name via the static catalog.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod catalog;
mod gemini;
mod openai;

use catalog::{provider_for_model, Provider};

const REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Unsupported model: {0}")]
    UnknownModel(String),

    #[error("No API key configured for provider {0:?}")]
    MissingApiKey(Provider),
}

impl LlmError {
    /// Transport-level failures worth one more attempt: connection errors,
    /// rate limits, and provider 5xx.
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Role of one chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One turn of an ordered chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// A provider-agnostic chat request. `json_mode` asks the provider for
/// schema-constrained JSON output (OpenAI `response_format`, Gemini
/// `responseMimeType`).
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub turns: Vec<ChatTurn>,
    pub json_mode: bool,
}

impl ChatRequest {
    /// The common case: one system prompt and one user prompt.
    pub fn single(
        model: impl Into<String>,
        temperature: f32,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            temperature,
            system: system.into(),
            turns: vec![ChatTurn::user(user)],
            json_mode: false,
        }
    }

    pub fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// The single LLM client used by all components. Wraps both provider APIs
/// with retry on transient failures.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    openai_api_key: Option<String>,
    google_api_key: Option<String>,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(
        openai_api_key: Option<String>,
        google_api_key: Option<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            openai_api_key,
            google_api_key,
            max_tokens,
        }
    }

    fn api_key_for(&self, provider: Provider) -> Result<&str, LlmError> {
        let key = match provider {
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Google => self.google_api_key.as_deref(),
        };
        key.ok_or(LlmError::MissingApiKey(provider))
    }

    /// Sends a chat request and returns the model's text.
    /// Retries on connection errors, 429 and 5xx with exponential backoff.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let provider = provider_for_model(&request.model)?;
        let api_key = self.api_key_for(provider)?;

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let result = match provider {
                Provider::OpenAi => {
                    openai::chat(&self.http, api_key, request, self.max_tokens).await
                }
                Provider::Google => {
                    gemini::chat(&self.http, api_key, request, self.max_tokens).await
                }
            };

            match result {
                Ok(text) => {
                    debug!(
                        model = %request.model,
                        chars = text.len(),
                        "LLM call succeeded"
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() => {
                    warn!("LLM API error on {}: {e}", request.model);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }

    /// Convenience method that sends the request in JSON mode and
    /// deserializes the text response. The prompt must instruct the model to
    /// return valid JSON.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        request: &ChatRequest,
    ) -> Result<T, LlmError> {
        let request = request.clone().with_json_mode();

        let text = self.chat(&request).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_missing_api_key_is_reported_per_provider() {
        let client = LlmClient::new(None, Some("g-key".to_string()), 4000);
        assert!(matches!(
            client.api_key_for(Provider::OpenAi),
            Err(LlmError::MissingApiKey(Provider::OpenAi))
        ));
        assert_eq!(client.api_key_for(Provider::Google).unwrap(), "g-key");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LlmError::Api {
            status: 429,
            message: "rate limited".to_string()
        }
        .is_retryable());
        assert!(LlmError::Api {
            status: 503,
            message: "overloaded".to_string()
        }
        .is_retryable());
        assert!(!LlmError::Api {
            status: 400,
            message: "bad request".to_string()
        }
        .is_retryable());
        assert!(!LlmError::EmptyContent.is_retryable());
    }

    #[test]
    fn test_chat_request_single_builds_one_user_turn() {
        let req = ChatRequest::single("gpt-4.1", 0.7, "system text", "user text");
        assert_eq!(req.turns.len(), 1);
        assert_eq!(req.turns[0].role, TurnRole::User);
        assert!(!req.json_mode);
        assert!(req.clone().with_json_mode().json_mode);
    }
}
