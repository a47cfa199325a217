use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::guideline::{prompts::DEFAULT_GUIDELINE_TEXT, review_guideline};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GuidelineResponse {
    pub guideline: String,
    pub is_default: bool,
}

/// GET /api/v1/sessions/:id/guidelines
///
/// Returns the session guideline, falling back to the built-in template
/// when the step is untouched. Reading never mutates the session.
pub async fn handle_get_guidelines(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GuidelineResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let is_default = session.writing_guidelines.trim().is_empty();
    Ok(Json(GuidelineResponse {
        guideline: if is_default {
            DEFAULT_GUIDELINE_TEXT.to_string()
        } else {
            session.writing_guidelines
        },
        is_default,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateGuidelineRequest {
    pub guideline: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateGuidelineResponse {
    pub guideline: String,
    pub changed: bool,
    /// Review details, present only when SURFACE_GUIDELINE_REVIEW is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// PUT /api/v1/sessions/:id/guidelines
///
/// An unchanged submission is a no-op. A changed one is run through the AI
/// review and the improved text is stored.
pub async fn handle_update_guidelines(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGuidelineRequest>,
) -> Result<Json<UpdateGuidelineResponse>, AppError> {
    let edited = req.guideline.trim().to_string();
    if edited.is_empty() {
        return Err(AppError::Validation("guideline text is required".to_string()));
    }

    let session = state.sessions.get(id).await?;
    let current = if session.writing_guidelines.trim().is_empty() {
        DEFAULT_GUIDELINE_TEXT
    } else {
        session.writing_guidelines.as_str()
    };

    if edited == current {
        return Ok(Json(UpdateGuidelineResponse {
            guideline: current.to_string(),
            changed: false,
            is_valid: None,
            issues: None,
            suggestions: None,
        }));
    }

    let review = review_guideline(&edited, &state.llm).await?;
    let improved = review.improved_guideline.clone();

    let stored = improved.clone();
    state
        .sessions
        .update(id, |session| {
            session.writing_guidelines = stored;
            Ok(())
        })
        .await?;

    info!(
        "Session {id}: guideline updated (valid={}, {} issues)",
        review.is_valid,
        review.issues.len()
    );

    let surface = state.config.surface_guideline_review;
    Ok(Json(UpdateGuidelineResponse {
        guideline: improved,
        changed: true,
        is_valid: surface.then_some(review.is_valid),
        issues: surface.then_some(review.issues),
        suggestions: surface.then_some(review.suggestions),
    }))
}
