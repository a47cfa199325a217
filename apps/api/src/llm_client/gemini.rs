//! Google Gemini generateContent wire format.

use serde::Deserialize;
use serde_json::json;

use super::{ChatRequest, LlmError, TurnRole};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Deserialize)]
struct WireResponse {
    candidates: Option<Vec<WireCandidate>>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    parts: Option<Vec<WirePart>>,
}

#[derive(Debug, Deserialize)]
struct WirePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: WireErrorBody,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    message: String,
}

/// One attempt against the Gemini API. Retry policy lives in the caller.
pub async fn chat(
    http: &reqwest::Client,
    api_key: &str,
    request: &ChatRequest,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let contents: Vec<serde_json::Value> = request
        .turns
        .iter()
        .map(|turn| {
            json!({
                "role": match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Assistant => "model",
                },
                "parts": [{ "text": turn.content }],
            })
        })
        .collect();

    let mut generation_config = json!({
        "temperature": request.temperature,
        "maxOutputTokens": max_tokens,
    });
    if request.json_mode {
        generation_config["responseMimeType"] = json!("application/json");
    }

    let body = json!({
        "system_instruction": { "parts": [{ "text": request.system }] },
        "contents": contents,
        "generationConfig": generation_config,
    });

    let url = format!("{API_BASE}/{}:generateContent", request.model);
    let response = http
        .post(&url)
        .query(&[("key", api_key)])
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
    extract_text(parsed).ok_or(LlmError::EmptyContent)
}

/// Joins the text parts of the first candidate. Gemini may split a response
/// across several parts.
fn extract_text(response: WireResponse) -> Option<String> {
    let parts = response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts?;
    let joined = parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("\n");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "part one"}, {"text": "part two"}], "role": "model"}}
            ]
        }"#;
        let parsed: WireResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "part one\npart two");
    }

    #[test]
    fn test_extract_text_empty_candidates_is_none() {
        let parsed: WireResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text(parsed).is_none());
    }

    #[test]
    fn test_extract_text_missing_parts_is_none() {
        let json = r#"{"candidates": [{"content": {"role": "model"}}]}"#;
        let parsed: WireResponse = serde_json::from_str(json).unwrap();
        assert!(extract_text(parsed).is_none());
    }
}
