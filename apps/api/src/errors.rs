use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested step (or an action belonging to it) is not reachable yet
    /// because an earlier step's artifacts are missing.
    #[error("Step locked: {0}")]
    StepLocked(String),

    /// The current step's exit condition is unmet; carries the missing requirements.
    #[error("Cannot advance: {}", .0.join("; "))]
    ExitConditionUnmet(Vec<String>),

    /// A confirmed strategy already exists; the caller must choose keep or overwrite.
    #[error("A confirmed strategy already exists")]
    StrategyExists,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::StepLocked(msg) => (StatusCode::CONFLICT, "STEP_LOCKED", msg.clone()),
            AppError::ExitConditionUnmet(missing) => (
                StatusCode::CONFLICT,
                "EXIT_CONDITION_UNMET",
                missing.join("; "),
            ),
            AppError::StrategyExists => (
                StatusCode::CONFLICT,
                "STRATEGY_EXISTS",
                "A confirmed strategy already exists. Re-submit with mode=keep or mode=overwrite."
                    .to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::Scrape(msg) => {
                tracing::warn!("Scrape error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SCRAPE_FAILED",
                    format!("{msg}. Paste the job posting text manually instead."),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_condition_unmet_lists_requirements() {
        let err = AppError::ExitConditionUnmet(vec![
            "company name is required".to_string(),
            "at least one essay question is required".to_string(),
        ]);
        assert!(err.to_string().contains("company name"));
        assert!(err.to_string().contains("essay question"));
    }

    #[test]
    fn test_strategy_exists_is_conflict() {
        let response = AppError::StrategyExists.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_llm_error_is_bad_gateway() {
        let response = AppError::Llm("provider timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
