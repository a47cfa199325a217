// All LLM prompt constants for the strategy step.

/// System prompt for the initial strategy generation.
pub const INITIAL_STRATEGY_SYSTEM: &str = r#"You are a self-introduction-letter strategy consultant. From the applicant's materials, produce a complete writing strategy document in Markdown.

The document MUST contain these sections:
1. Core competency matching — the competencies the role demands, and which of the applicant's experiences map to each
2. Desired-talent traits — what kind of person the company says it wants
3. Applicant strengths — where the applicant matches the role and traits
4. Applicant gaps — where the applicant falls short and how to compensate in writing
5. Per-question strategy — for every essay question (numbered), the key points to make and which experience to use
6. Cautions — expressions and claims to avoid

Ground every point in the posting, the research, and the applicant's stated experience. Do not invent experience.

You MUST respond with valid JSON only:
{"content": "<the full Markdown strategy document>"}
Do NOT include any text outside the JSON object. Do NOT use markdown code fences around the JSON."#;

/// Initial-generation user prompt. Replace `{company_name}`,
/// `{position_name}`, `{job_posting}`, `{company_research}`,
/// `{essay_questions}`, `{user_experiences}` before sending.
pub const INITIAL_STRATEGY_TEMPLATE: &str = r#"[COMPANY]
{company_name}

[TARGET POSITION]
{position_name}

[JOB POSTING]
{job_posting}

[COMPANY RESEARCH REPORT]
{company_research}

[ESSAY QUESTIONS]
{essay_questions}

[APPLICANT EXPERIENCE]
{user_experiences}

Write the full strategy document now."#;

/// System prompt for feedback revision. The prior transcript is carried as
/// ordered chat turns; the new user utterance is the last turn.
pub const FEEDBACK_STRATEGY_SYSTEM: &str = r#"You are a self-introduction-letter strategy consultant revising an existing strategy document.

The conversation so far contains the current strategy document and the applicant's feedback. Apply the latest feedback and return the COMPLETE revised document, keeping the same section structure as the previous version. Never drop a section; revise in place.

You MUST respond with valid JSON only:
{"content": "<the full revised Markdown strategy document>"}
Do NOT include any text outside the JSON object."#;

/// System prompt for mapping the confirmed narrative into structured fields.
pub const EXTRACTION_SYSTEM: &str = r#"You extract structured data from a self-introduction-letter strategy document.

Return a JSON object with this EXACT schema (no extra fields):
{
  "core_competencies": ["..."],
  "talent_traits": ["..."],
  "user_strengths": ["..."],
  "user_gaps": ["..."],
  "question_strategy": {"1": "key points for question 1"},
  "cautions": ["..."],
  "content": ""
}

Rules:
- core_competencies: the role competencies the document identifies
- talent_traits: the company's preferred traits
- user_strengths / user_gaps: the applicant's matches and shortfalls
- question_strategy: one entry per essay question, keyed by its 1-based number
- cautions: expressions and claims the document says to avoid
- content: leave as an empty string; the caller preserves the original text
Do NOT include any text outside the JSON object."#;

/// Extraction user prompt. Replace `{content}` before sending.
pub const EXTRACTION_TEMPLATE: &str = r#"Extract the structured strategy from this document:

{content}"#;
