//! Writing guideline (step 5) — a built-in template the user may edit, with
//! one structured review call that returns an improved version.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::{ChatRequest, LlmClient};

const REVIEW_MODEL: &str = "gemini-2.5-flash";
const REVIEW_TEMPERATURE: f32 = 0.3;

/// Structured output of the guideline review call. Issues and suggestions
/// are computed regardless; whether they are surfaced to the caller is a
/// config decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidelineReview {
    pub is_valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub improved_guideline: String,
}

pub fn build_review_request(user_guideline: &str) -> ChatRequest {
    let system = prompts::GUIDELINE_REVIEW_SYSTEM
        .replace("{default_guideline}", prompts::DEFAULT_GUIDELINE_TEXT);
    let prompt = prompts::GUIDELINE_REVIEW_TEMPLATE.replace("{user_guideline}", user_guideline);
    ChatRequest::single(REVIEW_MODEL, REVIEW_TEMPERATURE, system, prompt)
}

/// Reviews a user-edited guideline and returns the full review record.
pub async fn review_guideline(
    user_guideline: &str,
    llm: &LlmClient,
) -> Result<GuidelineReview, AppError> {
    let request = build_review_request(user_guideline);
    llm.chat_json::<GuidelineReview>(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Guideline review failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_request_embeds_default_template_and_user_text() {
        let request = build_review_request("Always write in first person.");
        assert!(request.system.contains("Core writing principles"));
        assert!(request.turns[0].content.contains("Always write in first person."));
    }

    #[test]
    fn test_guideline_review_deserializes_with_defaulted_lists() {
        let json = r#"{"is_valid": true, "improved_guideline": "fine as is"}"#;
        let review: GuidelineReview = serde_json::from_str(json).unwrap();
        assert!(review.is_valid);
        assert!(review.issues.is_empty());
        assert_eq!(review.improved_guideline, "fine as is");
    }

    #[test]
    fn test_default_guideline_is_nonempty() {
        assert!(prompts::DEFAULT_GUIDELINE_TEXT.contains("STAR"));
    }
}
