//! Final review (step 7) — one polish call per question, run concurrently.
//!
//! Each question's selected draft is revised against the user's feedback (or
//! a neutral default when none was given). Like drafting, the batch is
//! all-or-nothing.

pub mod handlers;
pub mod prompts;

use std::collections::BTreeMap;
use std::future::Future;

use futures::future::try_join_all;

use crate::errors::AppError;
use crate::guideline::prompts::DEFAULT_GUIDELINE_TEXT;
use crate::llm_client::{ChatRequest, LlmClient};
use crate::session::models::Session;

const REVIEW_MODEL: &str = "gemini-3-pro-preview";
const REVIEW_TEMPERATURE: f32 = 0.7;

/// Everything one polish call needs, resolved from the session up front.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    pub question_id: String,
    pub question_text: String,
    pub draft: String,
    pub feedback: String,
}

/// Resolves the selected draft and feedback for every question. A question
/// with no recorded selection falls back to its first draft; empty feedback
/// falls back to the neutral default.
pub fn build_review_contexts(session: &Session) -> Result<Vec<ReviewContext>, AppError> {
    let mut contexts = Vec::with_capacity(session.essay_questions.len());

    for (index, question) in session.essay_questions.iter().enumerate() {
        let question_id = (index + 1).to_string();
        let drafts = session.generated_drafts.get(&question_id).ok_or_else(|| {
            AppError::StepLocked(format!(
                "no drafts for question {question_id}; run draft generation first"
            ))
        })?;

        let selection = session
            .draft_selections
            .get(&question_id)
            .copied()
            .unwrap_or(0);
        let draft = drafts.get(selection).or_else(|| drafts.first()).ok_or_else(|| {
            AppError::StepLocked(format!("question {question_id} has an empty draft list"))
        })?;

        let feedback = session
            .draft_feedbacks
            .get(&question_id)
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .unwrap_or(prompts::DEFAULT_FEEDBACK);

        contexts.push(ReviewContext {
            question_id,
            question_text: question.question_text.clone(),
            draft: draft.clone(),
            feedback: feedback.to_string(),
        });
    }

    Ok(contexts)
}

pub fn build_review_request(session: &Session, context: &ReviewContext) -> ChatRequest {
    let guidelines = if session.writing_guidelines.trim().is_empty() {
        DEFAULT_GUIDELINE_TEXT
    } else {
        session.writing_guidelines.as_str()
    };

    let system = prompts::REVIEW_SYSTEM_TEMPLATE
        .replace("{company_name}", &session.company_name)
        .replace("{position_name}", &session.position_name)
        .replace("{user_experiences}", &session.user_experiences)
        .replace("{guidelines}", guidelines);

    let user = prompts::REVIEW_USER_TEMPLATE
        .replace("{question}", &context.question_text)
        .replace("{draft}", &context.draft)
        .replace("{feedback}", &context.feedback);

    ChatRequest::single(REVIEW_MODEL, REVIEW_TEMPERATURE, system, user)
}

/// Polishes every question concurrently through `call` and returns the
/// finished essays keyed by question id.
pub async fn polish_essays_with<F, Fut>(
    session: &Session,
    call: F,
) -> Result<BTreeMap<String, String>, AppError>
where
    F: Fn(ChatRequest) -> Fut,
    Fut: Future<Output = Result<String, AppError>>,
{
    let contexts = build_review_contexts(session)?;
    let requests: Vec<_> = contexts
        .iter()
        .map(|context| build_review_request(session, context))
        .collect();

    let outputs = try_join_all(requests.into_iter().map(&call)).await?;

    Ok(contexts
        .into_iter()
        .zip(outputs)
        .map(|(context, essay)| (context.question_id, essay.trim().to_string()))
        .collect())
}

/// Network-backed entry point; tests go through [`polish_essays_with`].
pub async fn polish_essays(
    session: &Session,
    llm: &LlmClient,
) -> Result<BTreeMap<String, String>, AppError> {
    polish_essays_with(session, |request| async move {
        llm.chat(&request)
            .await
            .map_err(|e| AppError::Llm(format!("Final review failed: {e}")))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::EssayQuestion;

    fn reviewed_session() -> Session {
        let mut session = Session::new();
        session.company_name = "Acme".to_string();
        session.position_name = "Engineer".to_string();
        session.user_experiences = "Operated pipelines.".to_string();
        for i in 0..2 {
            session.essay_questions.push(EssayQuestion {
                id: format!("q-{i}"),
                question_text: format!("Question {}", i + 1),
                char_limit: None,
            });
        }
        session.generated_drafts.insert(
            "1".to_string(),
            vec!["draft 1a".to_string(), "draft 1b".to_string()],
        );
        session
            .generated_drafts
            .insert("2".to_string(), vec!["draft 2a".to_string()]);
        session.draft_selections.insert("1".to_string(), 1);
        session
            .draft_feedbacks
            .insert("1".to_string(), "mention the migration".to_string());
        session
    }

    #[test]
    fn test_contexts_resolve_selection_and_default_feedback() {
        let contexts = build_review_contexts(&reviewed_session()).unwrap();
        assert_eq!(contexts.len(), 2);

        assert_eq!(contexts[0].draft, "draft 1b");
        assert_eq!(contexts[0].feedback, "mention the migration");

        // No selection and no feedback recorded for question 2.
        assert_eq!(contexts[1].draft, "draft 2a");
        assert_eq!(contexts[1].feedback, prompts::DEFAULT_FEEDBACK);
    }

    #[test]
    fn test_contexts_require_drafts_for_every_question() {
        let mut session = reviewed_session();
        session.generated_drafts.remove("2");
        assert!(matches!(
            build_review_contexts(&session),
            Err(AppError::StepLocked(_))
        ));
    }

    #[test]
    fn test_review_request_embeds_draft_and_feedback() {
        let session = reviewed_session();
        let contexts = build_review_contexts(&session).unwrap();
        let request = build_review_request(&session, &contexts[0]);

        assert!(request.system.contains("Engineer role at Acme"));
        assert!(request.turns[0].content.contains("draft 1b"));
        assert!(request.turns[0].content.contains("mention the migration"));
    }

    #[tokio::test]
    async fn test_polish_runs_one_call_per_question() {
        let session = reviewed_session();
        let essays = polish_essays_with(&session, |request| async move {
            let tag = if request.turns[0].content.contains("Question 1") {
                "one"
            } else {
                "two"
            };
            Ok(format!("polished {tag}\n"))
        })
        .await
        .unwrap();

        assert_eq!(essays.len(), 2);
        assert_eq!(essays["1"], "polished one");
        assert_eq!(essays["2"], "polished two");
    }

    #[tokio::test]
    async fn test_polish_is_all_or_nothing() {
        let session = reviewed_session();
        let result = polish_essays_with(&session, |request| async move {
            if request.turns[0].content.contains("Question 2") {
                Err(AppError::Llm("provider timeout".to_string()))
            } else {
                Ok("fine".to_string())
            }
        })
        .await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
