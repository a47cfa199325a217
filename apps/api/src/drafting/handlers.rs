use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::drafting::{apply_drafts, generate_drafts, DEFAULT_DRAFT_MODELS};
use crate::errors::AppError;
use crate::llm_client::catalog::provider_for_model;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateDraftsRequest {
    /// Models to draft with; defaults to the built-in pair.
    pub models: Option<Vec<String>>,
    /// Regenerate even when drafts already exist.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct DraftsResponse {
    pub drafts: BTreeMap<String, Vec<String>>,
    pub models: Vec<String>,
    pub regenerated: bool,
}

/// POST /api/v1/sessions/:id/drafts
///
/// Fans out question x model draft calls. A second call returns the stored
/// drafts untouched unless `force` is set.
pub async fn handle_generate_drafts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GenerateDraftsRequest>,
) -> Result<Json<DraftsResponse>, AppError> {
    let session = state.sessions.get(id).await?;

    if session.essay_questions.is_empty() {
        return Err(AppError::StepLocked(
            "no essay questions in this session; complete step 1 first".to_string(),
        ));
    }
    if session.writing_strategy.is_none() {
        return Err(AppError::StepLocked(
            "no confirmed writing strategy; complete step 4 first".to_string(),
        ));
    }

    if !session.generated_drafts.is_empty() && !req.force {
        return Ok(Json(DraftsResponse {
            drafts: session.generated_drafts,
            models: session.draft_models,
            regenerated: false,
        }));
    }

    let models = match req.models {
        Some(models) if !models.is_empty() => models,
        _ => DEFAULT_DRAFT_MODELS.iter().map(|s| s.to_string()).collect(),
    };
    for model in &models {
        provider_for_model(model)
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let drafts = generate_drafts(&session, &models, &state.llm).await?;

    info!(
        "Session {id}: generated {} drafts ({} questions x {} models)",
        drafts.values().map(Vec::len).sum::<usize>(),
        drafts.len(),
        models.len()
    );

    let stored_models = models.clone();
    let stored_drafts = drafts.clone();
    state
        .sessions
        .update(id, |session| {
            apply_drafts(session, stored_models, stored_drafts);
            Ok(())
        })
        .await?;

    Ok(Json(DraftsResponse {
        drafts,
        models,
        regenerated: true,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SelectionsRequest {
    /// Question id -> index into that question's draft list.
    #[serde(default)]
    pub selections: BTreeMap<String, usize>,
    /// Question id -> free-form revision feedback (may be empty).
    #[serde(default)]
    pub feedbacks: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SelectionsResponse {
    pub selections: BTreeMap<String, usize>,
    pub feedbacks: BTreeMap<String, String>,
}

/// PUT /api/v1/sessions/:id/drafts/selections
///
/// Records which draft the user picked per question, plus optional revision
/// feedback. Unknown question ids and out-of-range indexes are rejected.
pub async fn handle_update_selections(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectionsRequest>,
) -> Result<Json<SelectionsResponse>, AppError> {
    let (selections, feedbacks) = state
        .sessions
        .update(id, |session| {
            if session.generated_drafts.is_empty() {
                return Err(AppError::StepLocked(
                    "no drafts generated yet; run draft generation first".to_string(),
                ));
            }

            for (question_id, index) in &req.selections {
                let drafts = session.generated_drafts.get(question_id).ok_or_else(|| {
                    AppError::Validation(format!("unknown question id: {question_id}"))
                })?;
                if *index >= drafts.len() {
                    return Err(AppError::Validation(format!(
                        "selection {index} out of range for question {question_id} ({} drafts)",
                        drafts.len()
                    )));
                }
            }
            for question_id in req.feedbacks.keys() {
                if !session.generated_drafts.contains_key(question_id) {
                    return Err(AppError::Validation(format!(
                        "unknown question id: {question_id}"
                    )));
                }
            }

            for (question_id, index) in &req.selections {
                session.draft_selections.insert(question_id.clone(), *index);
            }
            for (question_id, feedback) in &req.feedbacks {
                session
                    .draft_feedbacks
                    .insert(question_id.clone(), feedback.trim().to_string());
            }

            Ok((session.draft_selections.clone(), session.draft_feedbacks.clone()))
        })
        .await?;

    Ok(Json(SelectionsResponse {
        selections,
        feedbacks,
    }))
}
