// Prompts for the final per-question polish pass.

/// Feedback applied when the user leaves a question's feedback empty.
pub const DEFAULT_FEEDBACK: &str = "No specific changes requested; polish naturally.";

/// System prompt for polishing one selected draft. Replace `{guidelines}`,
/// `{company_name}`, `{position_name}` and `{user_experiences}` before
/// sending.
pub const REVIEW_SYSTEM_TEMPLATE: &str = r#"You are a professional editor of self-introduction letters for the {position_name} role at {company_name}. Revise the draft the user gives you according to their feedback.

[CANDIDATE EXPERIENCES]
{user_experiences}

[WRITING GUIDELINES]
{guidelines}

[RULES]
- Apply the user's feedback first; beyond it, only polish awkward or broken phrasing
- Never introduce facts the candidate did not describe
- Keep the draft's structure and voice unless the feedback says otherwise
- Follow every guideline rule exactly
- Return only the revised answer text, with no headings, labels or commentary"#;

/// Per-question user prompt. Replace `{question}`, `{draft}` and
/// `{feedback}` before sending.
pub const REVIEW_USER_TEMPLATE: &str = r#"Question: {question}

[DRAFT]
{draft}

[FEEDBACK]
{feedback}

Revise the draft now."#;
