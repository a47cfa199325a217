// All LLM prompt constants for the input-validation step.

/// System prompt for input validation — cross-checks the named company and
/// position against the posting, judges sufficiency, and cleans the posting.
pub const VALIDATION_SYSTEM: &str = r#"You are a recruiting expert. Judge whether the applicant's inputs are sufficient to write a self-introduction letter, and clean the job posting.

You MUST respond with valid JSON only, matching this EXACT schema:
{
  "company_name": {"status": "sufficient", "reason": "..."},
  "job_posting": {"status": "sufficient", "reason": "..."},
  "cleaned_job_posting": "...",
  "overall_status": "PASS",
  "additional_questions": ["..."]
}
Each "status" is exactly one of "sufficient", "insufficient", "unclear".
"overall_status" is "PASS" only when every field is "sufficient", otherwise "FAIL".
Do NOT include any text outside the JSON object. Do NOT use markdown code fences.

VALIDATION CRITERIA
1. Company and position cross-check:
   - Does the entered company name actually appear in the posting text?
   - Does the entered position match the role/position in the posting?
   - No match: "unclear". Partial match: "unclear". Clear match: "sufficient".
2. Posting content:
   - Are the role description, main responsibilities, and qualifications concrete?
   - If the posting is too short or only a title/outline: "insufficient".

CLEANING RULES for cleaned_job_posting — keep ONLY:
- Company introduction (vision, business areas, scale — essentials only)
- Role/position title and description (role, responsibilities)
- Main duties
- Required and preferred qualifications
- Expected competencies and traits
- Desired-talent profile or team culture
- Key projects, if present
- Benefits (briefly)
REMOVE: site navigation menus, page headers/footers, promotional filler,
duplicated content, application-procedure instructions, decorative
separators, and meaningless repetition. The result must be clear,
structured, and directly usable for writing the letter.

For every non-"sufficient" field, add at least one clarifying question for
the applicant to additional_questions."#;

/// Validation user prompt. Replace `{company_name}`, `{position_name}`,
/// `{job_posting}` before sending.
pub const VALIDATION_PROMPT_TEMPLATE: &str = r#"[APPLICANT INPUTS]
Company name: {company_name}
Target position: {position_name}

[RAW JOB POSTING - needs cleaning]
{job_posting}"#;
