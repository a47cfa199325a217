use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ChatTurn;
use crate::session::models::WritingStrategy;
use crate::session::steps::{self, Step};
use crate::state::AppState;
use crate::strategy::{
    confirm_requires_choice, extract_strategy, generate_initial, revise_with_feedback, ConfirmMode,
};

#[derive(Debug, Default, Deserialize)]
pub struct InitRequest {
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StrategyTurnResponse {
    pub content: String,
    pub transcript_len: usize,
}

/// POST /api/v1/sessions/:id/strategy/init
pub async fn handle_init(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InitRequest>,
) -> Result<Json<StrategyTurnResponse>, AppError> {
    let session = state.sessions.get(id).await?;

    if session
        .company_research
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .is_empty()
        || session.job_posting.trim().is_empty()
    {
        return Err(AppError::StepLocked(
            "research and job posting are required before strategy; complete step 3 first"
                .to_string(),
        ));
    }

    let content = generate_initial(&session, &state.llm, req.model.as_deref()).await?;

    let stored = content.clone();
    let transcript_len = state
        .sessions
        .update(id, |session| {
            // A concurrent init may have landed while this call ran.
            if !session.strategy_transcript.is_empty() {
                return Err(AppError::Validation(
                    "strategy chat already initialized".to_string(),
                ));
            }
            session.strategy_transcript.push(ChatTurn::assistant(stored));
            Ok(session.strategy_transcript.len())
        })
        .await?;

    info!("Session {id}: initial strategy generated");
    Ok(Json(StrategyTurnResponse {
        content,
        transcript_len,
    }))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub message: String,
    pub model: Option<String>,
}

/// POST /api/v1/sessions/:id/strategy/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<StrategyTurnResponse>, AppError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::Validation("feedback message is required".to_string()));
    }

    let session = state.sessions.get(id).await?;
    let content = revise_with_feedback(
        &session.strategy_transcript,
        &message,
        &state.llm,
        req.model.as_deref(),
    )
    .await?;

    let stored = content.clone();
    let transcript_len = state
        .sessions
        .update(id, |session| {
            session.strategy_transcript.push(ChatTurn::user(message));
            session.strategy_transcript.push(ChatTurn::assistant(stored));
            Ok(session.strategy_transcript.len())
        })
        .await?;

    info!("Session {id}: strategy revised (transcript {transcript_len} turns)");
    Ok(Json(StrategyTurnResponse {
        content,
        transcript_len,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmRequest {
    /// Required when a confirmed strategy already exists.
    pub mode: Option<ConfirmMode>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub kept_existing: bool,
    pub strategy: WritingStrategy,
    pub current_step: Step,
}

/// POST /api/v1/sessions/:id/strategy/confirm
///
/// Extracts the latest assistant document into a structured strategy and
/// advances to step 5. When a confirmed strategy already exists the caller
/// must choose keep or overwrite; this endpoint never overwrites silently.
pub async fn handle_confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let session = state.sessions.get(id).await?;

    if confirm_requires_choice(&session, req.mode) {
        return Err(AppError::StrategyExists);
    }

    if req.mode == Some(ConfirmMode::Keep) {
        let existing = session.writing_strategy.clone().ok_or_else(|| {
            AppError::Validation("no existing strategy to keep".to_string())
        })?;
        let current_step = state
            .sessions
            .update(id, |session| {
                if session.current_step == Step::Strategy {
                    steps::advance(session)?;
                }
                Ok(session.current_step)
            })
            .await?;
        info!("Session {id}: kept existing strategy");
        return Ok(Json(ConfirmResponse {
            kept_existing: true,
            strategy: existing,
            current_step,
        }));
    }

    let document = session
        .latest_strategy_document()
        .ok_or_else(|| {
            AppError::Validation("no strategy document to confirm; generate one first".to_string())
        })?
        .to_string();

    let strategy = extract_strategy(&document, &state.llm).await?;

    let stored = strategy.clone();
    let current_step = state
        .sessions
        .update(id, |session| {
            session.writing_strategy = Some(stored);
            if session.current_step == Step::Strategy {
                steps::advance(session)?;
            }
            Ok(session.current_step)
        })
        .await?;

    info!(
        "Session {id}: strategy confirmed ({} competencies, {} question entries)",
        strategy.core_competencies.len(),
        strategy.question_strategy.len()
    );
    Ok(Json(ConfirmResponse {
        kept_existing: false,
        strategy,
        current_step,
    }))
}
