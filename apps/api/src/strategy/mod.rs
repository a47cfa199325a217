//! Writing strategy (step 4) — a chat-style refinement loop.
//!
//! Three request shapes against the same document type: initial generation,
//! feedback revision over the accumulated transcript, and a separate
//! structured-extraction call issued on explicit confirmation. The narrative
//! text survives extraction verbatim.

pub mod handlers;
pub mod prompts;

use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::{ChatRequest, ChatTurn, LlmClient};
use crate::session::models::{Session, WritingStrategy};

const INITIAL_MODEL: &str = "gemini-3-pro-preview";
const FEEDBACK_MODEL: &str = "gemini-2.5-flash";
/// Extraction must be deterministic.
const EXTRACTION_MODEL: &str = "gemini-2.5-pro";
const STRATEGY_TEMPERATURE: f32 = 0.7;

/// The document wrapper both generation shapes return: the full Markdown
/// strategy text.
#[derive(Debug, Deserialize)]
pub struct StrategyResponse {
    pub content: String,
}

pub fn build_initial_request(session: &Session, model: &str) -> ChatRequest {
    let questions = session
        .essay_questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q.question_text))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = prompts::INITIAL_STRATEGY_TEMPLATE
        .replace("{company_name}", &session.company_name)
        .replace("{position_name}", &session.position_name)
        .replace("{job_posting}", &session.job_posting)
        .replace(
            "{company_research}",
            session.company_research.as_deref().unwrap_or("no research available"),
        )
        .replace("{essay_questions}", &questions)
        .replace("{user_experiences}", &session.user_experiences);

    ChatRequest::single(
        model,
        STRATEGY_TEMPERATURE,
        prompts::INITIAL_STRATEGY_SYSTEM,
        prompt,
    )
}

pub fn build_feedback_request(
    transcript: &[ChatTurn],
    user_input: &str,
    model: &str,
) -> ChatRequest {
    let mut turns = transcript.to_vec();
    turns.push(ChatTurn::user(user_input));
    ChatRequest {
        model: model.to_string(),
        temperature: STRATEGY_TEMPERATURE,
        system: prompts::FEEDBACK_STRATEGY_SYSTEM.to_string(),
        turns,
        json_mode: false,
    }
}

pub fn build_extraction_request(content: &str) -> ChatRequest {
    ChatRequest::single(
        EXTRACTION_MODEL,
        0.0,
        prompts::EXTRACTION_SYSTEM,
        prompts::EXTRACTION_TEMPLATE.replace("{content}", content),
    )
}

/// First assistant turn of the strategy chat. Refused when a transcript
/// already exists so re-entering the step never duplicates the generation.
pub async fn generate_initial(
    session: &Session,
    llm: &LlmClient,
    model: Option<&str>,
) -> Result<String, AppError> {
    if !session.strategy_transcript.is_empty() {
        return Err(AppError::Validation(
            "strategy chat already initialized; send feedback instead".to_string(),
        ));
    }

    let request = build_initial_request(session, model.unwrap_or(INITIAL_MODEL));
    let response: StrategyResponse = llm
        .chat_json(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Initial strategy generation failed: {e}")))?;
    Ok(response.content)
}

/// One feedback-revision turn over the accumulated transcript.
pub async fn revise_with_feedback(
    transcript: &[ChatTurn],
    user_input: &str,
    llm: &LlmClient,
    model: Option<&str>,
) -> Result<String, AppError> {
    if transcript.is_empty() {
        return Err(AppError::Validation(
            "no strategy to revise; generate the initial strategy first".to_string(),
        ));
    }

    let request = build_feedback_request(transcript, user_input, model.unwrap_or(FEEDBACK_MODEL));
    let response: StrategyResponse = llm
        .chat_json(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Strategy revision failed: {e}")))?;
    Ok(response.content)
}

/// Maps the confirmed narrative into structured fields. The narrative text
/// is preserved verbatim in `content` regardless of what the model returns.
pub async fn extract_strategy(
    content: &str,
    llm: &LlmClient,
) -> Result<WritingStrategy, AppError> {
    let request = build_extraction_request(content);
    let mut strategy: WritingStrategy = llm
        .chat_json(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Strategy extraction failed: {e}")))?;
    strategy.content = content.to_string();
    Ok(strategy)
}

/// Resolution for confirming when a strategy document already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmMode {
    Keep,
    Overwrite,
}

/// Whether confirm needs an explicit keep-vs-overwrite choice.
pub fn confirm_requires_choice(session: &Session, mode: Option<ConfirmMode>) -> bool {
    session.writing_strategy.is_some() && mode.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::TurnRole;
    use crate::session::models::EssayQuestion;

    fn session_with_research() -> Session {
        let mut session = Session::new();
        session.company_name = "Acme".to_string();
        session.position_name = "Engineer".to_string();
        session.job_posting = "Acme hires engineers.".to_string();
        session.company_research = Some("Acme grew 20% last year.".to_string());
        session.user_experiences = "Operated pipelines.".to_string();
        session.essay_questions = vec![
            EssayQuestion {
                id: "a".to_string(),
                question_text: "Why this role?".to_string(),
                char_limit: None,
            },
            EssayQuestion {
                id: "b".to_string(),
                question_text: "Biggest challenge?".to_string(),
                char_limit: Some(1000),
            },
        ];
        session
    }

    #[test]
    fn test_initial_request_numbers_questions() {
        let request = build_initial_request(&session_with_research(), INITIAL_MODEL);
        let user = &request.turns[0].content;
        assert!(user.contains("1. Why this role?"));
        assert!(user.contains("2. Biggest challenge?"));
        assert!(user.contains("Acme grew 20% last year."));
    }

    #[test]
    fn test_initial_request_without_research_uses_sentinel() {
        let mut session = session_with_research();
        session.company_research = None;
        let request = build_initial_request(&session, INITIAL_MODEL);
        assert!(request.turns[0].content.contains("no research available"));
    }

    #[test]
    fn test_feedback_request_appends_user_turn_to_transcript() {
        let transcript = vec![ChatTurn::assistant("draft v1"), ChatTurn::user("shorter")];
        let request = build_feedback_request(&transcript, "add metrics", FEEDBACK_MODEL);
        assert_eq!(request.turns.len(), 3);
        assert_eq!(request.turns[2].role, TurnRole::User);
        assert_eq!(request.turns[2].content, "add metrics");
        // The original transcript is not mutated
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_confirm_requires_choice_only_when_strategy_exists() {
        let mut session = session_with_research();
        assert!(!confirm_requires_choice(&session, None));

        session.writing_strategy = Some(WritingStrategy {
            core_competencies: vec![],
            talent_traits: vec![],
            user_strengths: vec![],
            user_gaps: vec![],
            question_strategy: Default::default(),
            cautions: vec![],
            content: "old".to_string(),
        });
        assert!(confirm_requires_choice(&session, None));
        assert!(!confirm_requires_choice(&session, Some(ConfirmMode::Keep)));
        assert!(!confirm_requires_choice(&session, Some(ConfirmMode::Overwrite)));
    }

    #[test]
    fn test_strategy_response_deserializes() {
        let response: StrategyResponse =
            serde_json::from_str(r###"{"content": "## Strategy\n..."}"###).unwrap();
        assert!(response.content.starts_with("## Strategy"));
    }
}
