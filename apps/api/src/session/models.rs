//! Session state — the single record holding all user inputs and all
//! intermediate/final artifacts of one workflow run.
//!
//! Ownership rule: a session is only read and written through the step
//! handlers; artifacts are never deleted except by a full reset.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm_client::ChatTurn;
use crate::session::steps::Step;

/// One self-introduction-letter question, created in step 1. `id` is the
/// question's 1-based position string; drafts, selections, feedbacks, and
/// final essays are all keyed by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayQuestion {
    pub id: String,
    pub question_text: String,
    pub char_limit: Option<u32>,
}

/// Per-field sufficiency judgment from the validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Sufficient,
    Insufficient,
    Unclear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationItem {
    pub status: FieldStatus,
    pub reason: String,
}

/// Full structured output of the input-validation call. Fully replaced on
/// re-validation; never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub company_name: ValidationItem,
    pub job_posting: ValidationItem,
    pub cleaned_job_posting: String,
    pub overall_status: OverallStatus,
    pub additional_questions: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.overall_status == OverallStatus::Pass
    }
}

/// The structured writing strategy extracted from the confirmed chat
/// document. `content` preserves the narrative text verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritingStrategy {
    pub core_competencies: Vec<String>,
    pub talent_traits: Vec<String>,
    pub user_strengths: Vec<String>,
    pub user_gaps: Vec<String>,
    /// Key: 1-based question id, value: per-question writing points.
    pub question_strategy: BTreeMap<String, String>,
    pub cautions: Vec<String>,
    pub content: String,
}

/// The whole workflow state for one user session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    // Step 1 inputs
    pub company_name: String,
    pub position_name: String,
    pub job_posting: String,
    pub job_posting_url: String,
    pub essay_questions: Vec<EssayQuestion>,
    pub user_experiences: String,

    // Step 2 artifact
    pub validation: Option<ValidationReport>,

    // Step 3 artifact
    pub company_research: Option<String>,

    // Step 4 artifacts
    pub strategy_transcript: Vec<ChatTurn>,
    pub writing_strategy: Option<WritingStrategy>,

    // Step 5 artifact (empty = untouched, defaulted on step exit)
    pub writing_guidelines: String,

    // Step 6 artifacts: question id -> drafts ordered by `draft_models`
    pub generated_drafts: BTreeMap<String, Vec<String>>,
    pub draft_models: Vec<String>,
    pub draft_selections: BTreeMap<String, usize>,
    pub draft_feedbacks: BTreeMap<String, String>,

    // Step 7 artifact
    pub confirmed_essays: BTreeMap<String, String>,

    pub current_step: Step,
    pub completed_steps: BTreeSet<u8>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            company_name: String::new(),
            position_name: String::new(),
            job_posting: String::new(),
            job_posting_url: String::new(),
            essay_questions: Vec::new(),
            user_experiences: String::new(),
            validation: None,
            company_research: None,
            strategy_transcript: Vec::new(),
            writing_strategy: None,
            writing_guidelines: String::new(),
            generated_drafts: BTreeMap::new(),
            draft_models: Vec::new(),
            draft_selections: BTreeMap::new(),
            draft_feedbacks: BTreeMap::new(),
            confirmed_essays: BTreeMap::new(),
            current_step: Step::Input,
            completed_steps: BTreeSet::new(),
        }
    }

    /// 1-based string ids, in question order. Draft/feedback/essay maps are
    /// keyed by these.
    pub fn question_ids(&self) -> Vec<String> {
        (1..=self.essay_questions.len())
            .map(|i| i.to_string())
            .collect()
    }

    /// The most recent assistant turn of the strategy chat, if any.
    pub fn latest_strategy_document(&self) -> Option<&str> {
        self.strategy_transcript
            .iter()
            .rev()
            .find(|turn| turn.role == crate::llm_client::TurnRole::Assistant)
            .map(|turn| turn.content.as_str())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ChatTurn;

    #[test]
    fn test_new_session_starts_at_step_one() {
        let session = Session::new();
        assert_eq!(session.current_step, Step::Input);
        assert!(session.completed_steps.is_empty());
        assert!(session.validation.is_none());
        assert!(session.generated_drafts.is_empty());
    }

    #[test]
    fn test_question_ids_are_one_based_strings() {
        let mut session = Session::new();
        for i in 0..3 {
            session.essay_questions.push(EssayQuestion {
                id: (i + 1).to_string(),
                question_text: format!("Question {i}"),
                char_limit: None,
            });
        }
        assert_eq!(session.question_ids(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_latest_strategy_document_picks_last_assistant_turn() {
        let mut session = Session::new();
        session.strategy_transcript.push(ChatTurn::assistant("v1"));
        session.strategy_transcript.push(ChatTurn::user("make it shorter"));
        session.strategy_transcript.push(ChatTurn::assistant("v2"));
        assert_eq!(session.latest_strategy_document(), Some("v2"));
    }

    #[test]
    fn test_latest_strategy_document_empty_transcript() {
        assert!(Session::new().latest_strategy_document().is_none());
    }

    #[test]
    fn test_field_status_deserializes_snake_case() {
        let status: FieldStatus = serde_json::from_str(r#""sufficient""#).unwrap();
        assert_eq!(status, FieldStatus::Sufficient);
        let status: FieldStatus = serde_json::from_str(r#""unclear""#).unwrap();
        assert_eq!(status, FieldStatus::Unclear);
    }

    #[test]
    fn test_validation_report_pass_fail() {
        let json = r#"{
            "company_name": {"status": "sufficient", "reason": "Named throughout the posting"},
            "job_posting": {"status": "sufficient", "reason": "Detailed responsibilities listed"},
            "cleaned_job_posting": "Acme is hiring an Engineer...",
            "overall_status": "PASS",
            "additional_questions": []
        }"#;
        let report: ValidationReport = serde_json::from_str(json).unwrap();
        assert!(report.passed());
    }

    #[test]
    fn test_writing_strategy_deserializes_question_map() {
        let json = r#"{
            "core_competencies": ["distributed systems"],
            "talent_traits": ["ownership"],
            "user_strengths": ["production Rust experience"],
            "user_gaps": ["no fintech background"],
            "question_strategy": {"1": "lead with the migration project"},
            "cautions": ["avoid generic ambition statements"],
            "content": "full narrative"
        }"#;
        let strategy: WritingStrategy = serde_json::from_str(json).unwrap();
        assert_eq!(strategy.question_strategy["1"], "lead with the migration project");
        assert_eq!(strategy.content, "full narrative");
    }
}
