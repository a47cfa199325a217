//! OpenAI chat-completions wire format.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{ChatRequest, LlmError, TurnRole};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: WireErrorBody,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    message: String,
}

/// One attempt against the OpenAI API. Retry policy lives in the caller.
pub async fn chat(
    http: &reqwest::Client,
    api_key: &str,
    request: &ChatRequest,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let mut messages = vec![WireMessage {
        role: "system",
        content: &request.system,
    }];
    for turn in &request.turns {
        messages.push(WireMessage {
            role: match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "assistant",
            },
            content: &turn.content,
        });
    }

    let mut body = json!({
        "model": request.model,
        "temperature": request.temperature,
        "max_tokens": max_tokens,
        "messages": messages,
    });
    if request.json_mode {
        body["response_format"] = json!({ "type": "json_object" });
    }

    let response = http
        .post(API_URL)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<WireError>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: WireResponse = response.json().await?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.is_empty())
        .ok_or(LlmError::EmptyContent)
}
