// Built-in guideline template and the prompts for the AI guideline review.

/// The default writing guideline applied when the user leaves the step
/// untouched. Shared by draft generation and final review.
pub const DEFAULT_GUIDELINE_TEXT: &str = r#"### [Core writing principles]
- Style: concise, declarative prose (no ornamental phrasing; stick to objective facts)
- Tone: professional-document register, minimal emotional language
- Structure: key point -> supporting experience/result (STAR method) -> connection to the role and company
- Goals: realistic and concrete (time- and action-based, measurable outcomes)

### [Hard rules]
- No AI-sounding boilerplate: avoid formulaic or over-positive stock phrases (e.g. "I hope to contribute", "passionate", "always giving my best")
- Plain text only: no emoji or decorative special characters
- No inflated vision statements or abstract ambition: focus on concrete plans and feasibility
- Emphasize role competencies: state the competencies and experience relevant to the target position explicitly
- Accuracy and polish: no typos, no broken sentences"#;

/// System prompt for reviewing a user-edited guideline against the default
/// template. Replace `{default_guideline}` before sending.
pub const GUIDELINE_REVIEW_SYSTEM: &str = r#"You review self-introduction-letter writing guidelines. Compare the user's guideline against the base template and evaluate it on:

[REVIEW CRITERIA]
1. Clarity: are the rules concrete and actionable?
2. Consistency: are any rules contradictory?
3. Practicality: can they actually be applied while writing?
4. Completeness: are important writing principles missing?

[CONSTRAINTS]
- Respect the user's intent; only flag clear problems
- Suggest concrete replacements for vague or abstract rules
- The improved guideline must be directly usable by a model writing the letter
- Preserve as much of the user's original wording as possible

[BASE TEMPLATE]
{default_guideline}

You MUST respond with valid JSON only, matching this EXACT schema:
{
  "is_valid": true,
  "issues": ["..."],
  "suggestions": ["..."],
  "improved_guideline": "..."
}
"improved_guideline" is the improved version when problems exist, otherwise the approved original.
Do NOT include any text outside the JSON object."#;

/// Review user prompt. Replace `{user_guideline}` before sending.
pub const GUIDELINE_REVIEW_TEMPLATE: &str = r#"Review this self-introduction-letter writing guideline:

{user_guideline}

Identify its problems and, where needed, propose an improved version."#;
