//! Session lifecycle and navigation handlers: create/read/reset, the
//! step-1 input form, explicit advance/back/goto, and the step-8 final view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::models::{EssayQuestion, Session};
use crate::session::steps::{self, Step};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StepInfo {
    pub number: u8,
    pub name: &'static str,
    pub completed: bool,
    pub current: bool,
    pub accessible: bool,
}

/// The progress sidebar: all 8 steps with completion and reachability flags.
#[derive(Debug, Serialize)]
pub struct Progress {
    pub steps: Vec<StepInfo>,
    pub max_accessible: u8,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
    pub progress: Progress,
}

pub fn build_progress(session: &Session) -> Progress {
    let max_accessible = steps::max_accessible(session);
    Progress {
        steps: Step::ALL
            .iter()
            .map(|&step| StepInfo {
                number: step.number(),
                name: step.name(),
                completed: session.completed_steps.contains(&step.number()),
                current: session.current_step == step,
                accessible: step <= max_accessible,
            })
            .collect(),
        max_accessible: max_accessible.number(),
    }
}

fn session_response(session: Session) -> Json<SessionResponse> {
    let progress = build_progress(&session);
    Json(SessionResponse { session, progress })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.create().await;
    info!("Created session {}", session.id);
    Ok(session_response(session))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(session_response(session))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.reset(id).await?;
    info!("Reset session {id}");
    Ok(session_response(session))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    info!("Deleted session {id}");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    pub question_text: String,
    pub char_limit: Option<u32>,
}

/// Blank questions are dropped; the survivors get 1-based position strings
/// as ids, the same keys every artifact map uses.
fn build_questions(inputs: &[QuestionInput]) -> Vec<EssayQuestion> {
    inputs
        .iter()
        .filter(|q| !q.question_text.trim().is_empty())
        .enumerate()
        .map(|(i, q)| EssayQuestion {
            id: (i + 1).to_string(),
            question_text: q.question_text.trim().to_string(),
            char_limit: q.char_limit,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct InputsRequest {
    pub company_name: String,
    pub position_name: String,
    pub job_posting_url: String,
    pub job_posting: String,
    pub essay_questions: Vec<QuestionInput>,
    pub user_experiences: String,
}

/// PUT /api/v1/sessions/:id/inputs
///
/// Stores the step-1 form and advances to validation. Any previous
/// validation report is discarded: edited inputs must be re-validated.
pub async fn handle_submit_inputs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InputsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .update(id, |session| {
            if session.current_step != Step::Input {
                return Err(AppError::StepLocked(
                    "navigate to step 1 before editing inputs".to_string(),
                ));
            }

            session.company_name = req.company_name.trim().to_string();
            session.position_name = req.position_name.trim().to_string();
            session.job_posting_url = req.job_posting_url.trim().to_string();
            session.job_posting = req.job_posting.trim().to_string();
            session.user_experiences = req.user_experiences.trim().to_string();
            session.essay_questions = build_questions(&req.essay_questions);
            session.validation = None;

            steps::advance(session)?;
            Ok(session.clone())
        })
        .await?;

    info!(
        "Session {id}: inputs stored ({} questions), moved to validation",
        session.essay_questions.len()
    );
    Ok(session_response(session))
}

/// POST /api/v1/sessions/:id/advance
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .update(id, |session| {
            steps::advance(session)?;
            Ok(session.clone())
        })
        .await?;
    Ok(session_response(session))
}

/// POST /api/v1/sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .update(id, |session| {
            steps::go_back(session)?;
            Ok(session.clone())
        })
        .await?;
    Ok(session_response(session))
}

#[derive(Debug, Deserialize)]
pub struct GotoRequest {
    pub step: u8,
}

/// POST /api/v1/sessions/:id/step
pub async fn handle_goto(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GotoRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let target = Step::from_number(req.step)
        .ok_or_else(|| AppError::Validation(format!("step must be 1-8, got {}", req.step)))?;
    let session = state
        .sessions
        .update(id, |session| {
            steps::goto(session, target)?;
            Ok(session.clone())
        })
        .await?;
    Ok(session_response(session))
}

#[derive(Debug, Serialize)]
pub struct FinalEssay {
    pub question_id: String,
    pub question_text: String,
    pub char_limit: Option<u32>,
    pub text: String,
}

/// The assembled step-8 view: all accumulated artifacts, no computation.
#[derive(Debug, Serialize)]
pub struct FinalView {
    pub company_name: String,
    pub position_name: String,
    pub job_posting: String,
    pub user_experiences: String,
    pub company_research: Option<String>,
    pub strategy: Option<String>,
    pub writing_guidelines: String,
    pub essays: Vec<FinalEssay>,
}

/// GET /api/v1/sessions/:id/final
pub async fn handle_final_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FinalView>, AppError> {
    let session = state.sessions.get(id).await?;

    if session.confirmed_essays.is_empty() {
        return Err(AppError::StepLocked(
            "no confirmed essays yet; complete step 7 first".to_string(),
        ));
    }

    let essays = session
        .essay_questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let qid = (i + 1).to_string();
            FinalEssay {
                question_text: q.question_text.clone(),
                char_limit: q.char_limit,
                text: session.confirmed_essays.get(&qid).cloned().unwrap_or_default(),
                question_id: qid,
            }
        })
        .collect();

    Ok(Json(FinalView {
        company_name: session.company_name,
        position_name: session.position_name,
        job_posting: session.job_posting,
        user_experiences: session.user_experiences,
        company_research: session.company_research,
        strategy: session.writing_strategy.map(|s| s.content),
        writing_guidelines: session.writing_guidelines,
        essays,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_marks_current_and_accessible() {
        let mut session = Session::new();
        session.completed_steps.insert(1);
        session.completed_steps.insert(2);
        session.current_step = Step::Research;

        let progress = build_progress(&session);
        assert_eq!(progress.max_accessible, 3);
        assert!(progress.steps[0].completed);
        assert!(progress.steps[2].current);
        assert!(progress.steps[2].accessible);
        assert!(!progress.steps[3].accessible);
    }

    #[test]
    fn test_question_ids_match_artifact_map_keys() {
        let inputs = vec![
            QuestionInput {
                question_text: "  Why this role?  ".to_string(),
                char_limit: Some(500),
            },
            QuestionInput {
                question_text: "   ".to_string(),
                char_limit: None,
            },
            QuestionInput {
                question_text: "Biggest challenge?".to_string(),
                char_limit: None,
            },
        ];

        let questions = build_questions(&inputs);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, "1");
        assert_eq!(questions[0].question_text, "Why this role?");
        assert_eq!(questions[1].id, "2");

        // The serialized ids are the keys drafts/selections/essays use.
        let mut session = Session::new();
        session.essay_questions = questions;
        let ids: Vec<String> = session.essay_questions.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids, session.question_ids());
    }

    #[test]
    fn test_progress_fresh_session_only_step_one_accessible() {
        let progress = build_progress(&Session::new());
        assert_eq!(progress.max_accessible, 1);
        assert!(progress.steps[0].accessible);
        assert!(progress.steps.iter().skip(1).all(|s| !s.accessible));
    }
}
