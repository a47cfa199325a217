use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::research::build_research_prompt;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResearchPromptResponse {
    pub prompt: String,
}

/// GET /api/v1/sessions/:id/research/prompt
pub async fn handle_research_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResearchPromptResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(ResearchPromptResponse {
        prompt: build_research_prompt(&session),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ResearchResponse {
    pub chars: usize,
}

/// PUT /api/v1/sessions/:id/research
pub async fn handle_submit_research(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, AppError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::Validation("research text is required".to_string()));
    }

    let chars = content.chars().count();
    state
        .sessions
        .update(id, |session| {
            session.company_research = Some(content);
            Ok(())
        })
        .await?;

    info!("Session {id}: research stored ({chars} chars)");
    Ok(Json(ResearchResponse { chars }))
}
