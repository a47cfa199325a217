//! Draft generation (step 6) — a concurrent fan-out of question x model.
//!
//! Every (question, model) pair becomes one chat call; all calls run
//! concurrently and the whole batch is all-or-nothing. On success the drafts
//! land keyed by 1-based question id, each list ordered by the model list,
//! with every selection defaulted to the first draft.

pub mod handlers;
pub mod prompts;

use std::collections::BTreeMap;
use std::future::Future;

use futures::future::try_join_all;

use crate::errors::AppError;
use crate::guideline::prompts::DEFAULT_GUIDELINE_TEXT;
use crate::llm_client::{ChatRequest, LlmClient};
use crate::session::models::Session;

/// Models drafted against when the caller does not name any.
pub const DEFAULT_DRAFT_MODELS: &[&str] = &["gemini-3-pro-preview", "gpt-4.1"];
/// Drafting wants variety across models, hence the high temperature.
const DRAFT_TEMPERATURE: f32 = 1.0;

fn writer_system(session: &Session) -> String {
    let strategy = session
        .writing_strategy
        .as_ref()
        .map(|s| s.content.as_str())
        .unwrap_or("no strategy available");
    let guidelines = if session.writing_guidelines.trim().is_empty() {
        DEFAULT_GUIDELINE_TEXT
    } else {
        session.writing_guidelines.as_str()
    };

    prompts::WRITER_SYSTEM_TEMPLATE
        .replace("{job_posting}", &session.job_posting)
        .replace("{strategy}", strategy)
        .replace("{user_experiences}", &session.user_experiences)
        .replace("{writing_guidelines}", guidelines)
}

pub fn build_draft_request(session: &Session, question_index: usize, model: &str) -> ChatRequest {
    let question = &session.essay_questions[question_index];
    let limit = question
        .char_limit
        .map(|n| format!("{n} characters"))
        .unwrap_or_else(|| "no limit".to_string());

    let user = prompts::WRITER_USER_TEMPLATE
        .replace("{question_text}", &question.question_text)
        .replace("{char_limit}", &limit);

    ChatRequest::single(model, DRAFT_TEMPERATURE, writer_system(session), user)
}

/// Runs the full fan-out through `call` and assembles the draft map.
///
/// Requests are issued in (question, model) order; `try_join_all` preserves
/// that order on success and fails the whole batch on the first error, so a
/// partial draft set never reaches the session.
pub async fn generate_drafts_with<F, Fut>(
    session: &Session,
    models: &[String],
    call: F,
) -> Result<BTreeMap<String, Vec<String>>, AppError>
where
    F: Fn(ChatRequest) -> Fut,
    Fut: Future<Output = Result<String, AppError>>,
{
    let mut requests = Vec::with_capacity(session.essay_questions.len() * models.len());
    for question_index in 0..session.essay_questions.len() {
        for model in models {
            requests.push(build_draft_request(session, question_index, model));
        }
    }

    let outputs = try_join_all(requests.into_iter().map(&call)).await?;

    let mut drafts = BTreeMap::new();
    for (question_index, chunk) in outputs.chunks(models.len()).enumerate() {
        drafts.insert((question_index + 1).to_string(), chunk.to_vec());
    }
    Ok(drafts)
}

/// Network-backed entry point; tests go through [`generate_drafts_with`]
/// with stub calls instead.
pub async fn generate_drafts(
    session: &Session,
    models: &[String],
    llm: &LlmClient,
) -> Result<BTreeMap<String, Vec<String>>, AppError> {
    generate_drafts_with(session, models, |request| async move {
        llm.chat(&request)
            .await
            .map_err(|e| AppError::Llm(format!("Draft generation failed on {}: {e}", request.model)))
    })
    .await
}

/// Stores a completed fan-out on the session: drafts, the model list they
/// are ordered by, and defaulted selections/feedbacks per question.
pub fn apply_drafts(
    session: &mut Session,
    models: Vec<String>,
    drafts: BTreeMap<String, Vec<String>>,
) {
    session.draft_selections = drafts.keys().map(|id| (id.clone(), 0)).collect();
    session.draft_feedbacks = drafts.keys().map(|id| (id.clone(), String::new())).collect();
    session.generated_drafts = drafts;
    session.draft_models = models;
}
