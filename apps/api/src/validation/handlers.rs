use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::models::ValidationReport;
use crate::state::AppState;
use crate::validation::{apply_report, validate_inputs};

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub report: ValidationReport,
    pub passed: bool,
}

/// POST /api/v1/sessions/:id/validate
///
/// Runs the step-2 validation call and stores the report. A failed report
/// blocks the 2→3 transition but is not an error at this endpoint; transport
/// or precondition failures are.
pub async fn handle_validate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ValidationResponse>, AppError> {
    // LLM call happens outside the store lock; the session is single-user.
    let session = state.sessions.get(id).await?;
    let report = validate_inputs(&session, &state.llm).await?;

    let passed = report.passed();
    info!(
        "Session {id}: validation {} (company={:?}, posting={:?})",
        if passed { "passed" } else { "failed" },
        report.company_name.status,
        report.job_posting.status,
    );

    let stored = report.clone();
    state
        .sessions
        .update(id, |session| {
            apply_report(session, stored);
            Ok(())
        })
        .await?;

    Ok(Json(ValidationResponse { report, passed }))
}
