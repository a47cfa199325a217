//! Step controller — the 8-step workflow state machine.
//!
//! Transitions are user-triggered only: forward on an explicit advance once
//! the current step's exit condition holds, backward on an explicit back.
//! Reading state never mutates it; a refused transition leaves the session
//! untouched.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guideline::prompts::DEFAULT_GUIDELINE_TEXT;
use crate::session::models::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    Input = 1,
    Validate = 2,
    Research = 3,
    Strategy = 4,
    Guidelines = 5,
    Drafts = 6,
    Review = 7,
    Final = 8,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::Input,
        Step::Validate,
        Step::Research,
        Step::Strategy,
        Step::Guidelines,
        Step::Drafts,
        Step::Review,
        Step::Final,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Input => "Input",
            Step::Validate => "Validate",
            Step::Research => "Research",
            Step::Strategy => "Strategy",
            Step::Guidelines => "Guidelines",
            Step::Drafts => "Drafts",
            Step::Review => "Review",
            Step::Final => "Final",
        }
    }

    pub fn from_number(n: u8) -> Option<Step> {
        Step::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    pub fn next(self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        Step::from_number(self.number().wrapping_sub(1))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(n: u8) -> Result<Step, Self::Error> {
        Step::from_number(n).ok_or_else(|| format!("step number out of range: {n}"))
    }
}

/// Missing requirements blocking the exit of the session's current step.
/// Empty means the session may advance.
pub fn missing_requirements(session: &Session) -> Vec<String> {
    let mut missing = Vec::new();

    match session.current_step {
        Step::Input => {
            if session.company_name.trim().is_empty() {
                missing.push("company name is required".to_string());
            }
            if session.position_name.trim().is_empty() {
                missing.push("position name is required".to_string());
            }
            if session.job_posting_url.trim().is_empty() {
                missing.push("job posting source URL is required".to_string());
            }
            if session.job_posting.trim().is_empty() {
                missing.push("job posting text is required".to_string());
            }
            if !session
                .essay_questions
                .iter()
                .any(|q| !q.question_text.trim().is_empty())
            {
                missing.push("at least one essay question is required".to_string());
            }
            if session.user_experiences.trim().is_empty() {
                missing.push("experience text is required".to_string());
            }
        }
        Step::Validate => match &session.validation {
            Some(report) if report.passed() => {}
            Some(_) => missing.push("validation did not pass; fix the inputs and re-validate".to_string()),
            None => missing.push("validation has not been run".to_string()),
        },
        Step::Research => {
            if session
                .company_research
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
            {
                missing.push("research text is required".to_string());
            }
        }
        Step::Strategy => {
            if session.writing_strategy.is_none() {
                missing.push("a confirmed strategy document is required".to_string());
            }
        }
        // Guidelines default to the built-in template if untouched,
        // so this step's exit is always satisfiable.
        Step::Guidelines => {}
        Step::Drafts => {
            if session.generated_drafts.is_empty() {
                missing.push("drafts have not been generated".to_string());
            } else {
                for qid in session.question_ids() {
                    if !session.draft_selections.contains_key(&qid) {
                        missing.push(format!("question {qid} has no draft selection"));
                    }
                    if !session.draft_feedbacks.contains_key(&qid) {
                        missing.push(format!("question {qid} has no feedback recorded"));
                    }
                }
            }
        }
        Step::Review => {
            for qid in session.question_ids() {
                if session
                    .confirmed_essays
                    .get(&qid)
                    .map(|text| text.trim().is_empty())
                    .unwrap_or(true)
                {
                    missing.push(format!("question {qid} has no confirmed final text"));
                }
            }
        }
        Step::Final => {
            missing.push("the final step has no forward transition".to_string());
        }
    }

    missing
}

/// Advances to the next step if the current exit condition holds, marking
/// the current step completed. Refusal leaves the session unchanged.
pub fn advance(session: &mut Session) -> Result<Step, AppError> {
    // Untouched guidelines fall back to the built-in template on exit.
    if session.current_step == Step::Guidelines && session.writing_guidelines.trim().is_empty() {
        session.writing_guidelines = DEFAULT_GUIDELINE_TEXT.to_string();
    }

    let missing = missing_requirements(session);
    if !missing.is_empty() {
        return Err(AppError::ExitConditionUnmet(missing));
    }

    let next = session
        .current_step
        .next()
        .ok_or_else(|| AppError::ExitConditionUnmet(vec![
            "the final step has no forward transition".to_string(),
        ]))?;

    session.completed_steps.insert(session.current_step.number());
    session.current_step = next;
    Ok(next)
}

/// Moves one step back. No exit condition applies to backward moves.
pub fn go_back(session: &mut Session) -> Result<Step, AppError> {
    let prev = session
        .current_step
        .prev()
        .ok_or_else(|| AppError::StepLocked("already at the first step".to_string()))?;
    session.current_step = prev;
    Ok(prev)
}

/// The furthest step the user may navigate to: max completed + 1.
pub fn max_accessible(session: &Session) -> Step {
    let max_completed = session.completed_steps.iter().max().copied().unwrap_or(0);
    Step::from_number((max_completed + 1).min(8)).unwrap_or(Step::Final)
}

/// Jumps to a step, allowed only up to `max_accessible`.
pub fn goto(session: &mut Session, target: Step) -> Result<Step, AppError> {
    let limit = max_accessible(session);
    if target > limit {
        return Err(AppError::StepLocked(format!(
            "step {} ({}) is not reachable yet; complete step {} first",
            target.number(),
            target.name(),
            limit.number()
        )));
    }
    session.current_step = target;
    Ok(target)
}
