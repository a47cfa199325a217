use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::review::polish_essays;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub essays: BTreeMap<String, String>,
}

/// POST /api/v1/sessions/:id/review
///
/// Polishes every question's selected draft concurrently and stores the
/// results as the confirmed essays. Re-running replaces them wholesale.
pub async fn handle_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let essays = polish_essays(&session, &state.llm).await?;

    let stored = essays.clone();
    state
        .sessions
        .update(id, |session| {
            session.confirmed_essays = stored;
            Ok(())
        })
        .await?;

    info!("Session {id}: {} essays polished", essays.len());
    Ok(Json(ReviewResponse { essays }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateEssayRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateEssayResponse {
    pub question_id: String,
    pub chars: usize,
}

/// PUT /api/v1/sessions/:id/essays/:question_id
///
/// Commits a manual edit to one finished essay.
pub async fn handle_update_essay(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, String)>,
    Json(req): Json<UpdateEssayRequest>,
) -> Result<Json<UpdateEssayResponse>, AppError> {
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation("essay text is required".to_string()));
    }

    let chars = text.chars().count();
    state
        .sessions
        .update(id, |session| {
            if !session.confirmed_essays.contains_key(&question_id) {
                return Err(AppError::Validation(format!(
                    "no reviewed essay for question {question_id}"
                )));
            }
            session.confirmed_essays.insert(question_id.clone(), text);
            Ok(())
        })
        .await?;

    Ok(Json(UpdateEssayResponse { question_id, chars }))
}
