//! Input validation (step 2) — one structured LLM call that cross-checks the
//! company/position names against the posting text, judges sufficiency, and
//! returns a cleaned posting.
//!
//! Cheap preconditions run in code first; the model is never called when
//! they fail.

pub mod handlers;
pub mod prompts;

use crate::errors::AppError;
use crate::llm_client::{ChatRequest, LlmClient};
use crate::session::models::{Session, ValidationReport};

/// Validation must be deterministic, so temperature is pinned to 0.
const VALIDATION_MODEL: &str = "gemini-2.5-flash";
const VALIDATION_TEMPERATURE: f32 = 0.0;

/// Minimum length of the free-text experience before validation may run.
pub const MIN_EXPERIENCE_CHARS: usize = 50;

/// Code-level preconditions checked before any model call.
pub fn check_preconditions(session: &Session) -> Result<(), AppError> {
    if session.user_experiences.trim().chars().count() < MIN_EXPERIENCE_CHARS {
        return Err(AppError::Validation(format!(
            "experience text is too short; enter at least {MIN_EXPERIENCE_CHARS} characters"
        )));
    }
    if session.essay_questions.is_empty() {
        return Err(AppError::Validation(
            "no essay questions defined; enter at least one question".to_string(),
        ));
    }
    if session.job_posting.trim().is_empty() {
        return Err(AppError::Validation(
            "job posting text is empty; scrape the URL or paste it manually".to_string(),
        ));
    }
    Ok(())
}

pub fn build_validation_request(session: &Session) -> ChatRequest {
    let prompt = prompts::VALIDATION_PROMPT_TEMPLATE
        .replace("{company_name}", &session.company_name)
        .replace("{position_name}", &session.position_name)
        .replace("{job_posting}", &session.job_posting);
    ChatRequest::single(
        VALIDATION_MODEL,
        VALIDATION_TEMPERATURE,
        prompts::VALIDATION_SYSTEM,
        prompt,
    )
}

/// Runs the validation call. Precondition failures return before the LLM
/// seam is reached.
pub async fn validate_inputs(
    session: &Session,
    llm: &LlmClient,
) -> Result<ValidationReport, AppError> {
    check_preconditions(session)?;

    let request = build_validation_request(session);
    llm.chat_json::<ValidationReport>(&request)
        .await
        .map_err(|e| AppError::Llm(format!("Input validation failed: {e}")))
}

/// Stores the report. On PASS the cleaned posting replaces the raw one, so
/// every later step works from the cleaned text.
pub fn apply_report(session: &mut Session, report: ValidationReport) {
    if report.passed() && !report.cleaned_job_posting.trim().is_empty() {
        session.job_posting = report.cleaned_job_posting.clone();
    }
    session.validation = Some(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::{
        EssayQuestion, FieldStatus, OverallStatus, ValidationItem,
    };

    fn valid_session() -> Session {
        let mut session = Session::new();
        session.company_name = "Acme".to_string();
        session.position_name = "Engineer".to_string();
        session.job_posting = "Acme is hiring an Engineer. Responsibilities: build and \
             operate the ingestion platform. Requirements: Rust, distributed systems."
            .to_string();
        session.essay_questions.push(EssayQuestion {
            id: "q1".to_string(),
            question_text: "Why this role?".to_string(),
            char_limit: Some(800),
        });
        session.user_experiences =
            "Three years operating a Rust ingestion pipeline at 50k events per second."
                .to_string();
        session
    }

    fn report(company: FieldStatus, posting: FieldStatus, overall: OverallStatus) -> ValidationReport {
        ValidationReport {
            company_name: ValidationItem {
                status: company,
                reason: "r1".to_string(),
            },
            job_posting: ValidationItem {
                status: posting,
                reason: "r2".to_string(),
            },
            cleaned_job_posting: "Acme - Engineer. Build the ingestion platform.".to_string(),
            overall_status: overall,
            additional_questions: vec![],
        }
    }

    #[test]
    fn test_precondition_short_experience_fails_before_llm() {
        let mut session = valid_session();
        session.user_experiences = "too short".to_string();
        let err = check_preconditions(&session).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn test_precondition_experience_counts_chars_not_bytes() {
        let mut session = valid_session();
        // 50 multibyte characters, fewer than 50 would be wrong to reject
        session.user_experiences = "경".repeat(MIN_EXPERIENCE_CHARS);
        assert!(check_preconditions(&session).is_ok());
    }

    #[test]
    fn test_precondition_requires_questions() {
        let mut session = valid_session();
        session.essay_questions.clear();
        assert!(check_preconditions(&session).is_err());
    }

    #[test]
    fn test_precondition_requires_posting() {
        let mut session = valid_session();
        session.job_posting = "   ".to_string();
        assert!(check_preconditions(&session).is_err());
    }

    #[test]
    fn test_build_request_fills_placeholders() {
        let session = valid_session();
        let request = build_validation_request(&session);
        let user = &request.turns[0].content;
        assert!(user.contains("Company name: Acme"));
        assert!(user.contains("Target position: Engineer"));
        assert!(user.contains("ingestion platform"));
        assert_eq!(request.temperature, 0.0);
    }

    #[test]
    fn test_apply_report_pass_replaces_posting_with_cleaned() {
        let mut session = valid_session();
        apply_report(
            &mut session,
            report(
                FieldStatus::Sufficient,
                FieldStatus::Sufficient,
                OverallStatus::Pass,
            ),
        );
        assert_eq!(
            session.job_posting,
            "Acme - Engineer. Build the ingestion platform."
        );
        assert!(session.validation.as_ref().unwrap().passed());
    }

    #[test]
    fn test_apply_report_fail_keeps_raw_posting() {
        let mut session = valid_session();
        let raw = session.job_posting.clone();
        apply_report(
            &mut session,
            report(
                FieldStatus::Unclear,
                FieldStatus::Sufficient,
                OverallStatus::Fail,
            ),
        );
        assert_eq!(session.job_posting, raw);
        assert!(!session.validation.as_ref().unwrap().passed());
    }
}
