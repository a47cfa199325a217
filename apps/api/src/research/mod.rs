//! Company research (step 3). The system does not run deep research itself:
//! it renders a prompt for an external research tool and ingests the
//! resulting report text.

pub mod handlers;

use crate::session::models::Session;

/// Renders the deep-research prompt for the user to paste into an external
/// research tool.
pub fn build_research_prompt(session: &Session) -> String {
    format!(
        r#"You are a corporate research analyst. Using the job posting below, write an in-depth research report on the company '{company}' and the '{position}' role.

[SUBJECT]
- Company: {company}
- Target position: {position}

[JOB POSTING]
{job_posting}

[REQUESTED SECTIONS]
Cover each of the following in detail:
1. Company overview and main business areas (including recent results)
2. Major issues and news from the last year (positive and negative)
3. Current management direction and vision (new-year addresses, CEO messages)
4. Organizational culture and desired-talent profile
5. Core responsibilities and required competencies of the {position} role
6. Industry trends and competitor landscape

The report will be used to build a self-introduction-letter writing strategy, so stick to concrete facts."#,
        company = session.company_name,
        position = session.position_name,
        job_posting = session.job_posting,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_prompt_includes_company_position_and_posting() {
        let mut session = Session::new();
        session.company_name = "Acme".to_string();
        session.position_name = "Engineer".to_string();
        session.job_posting = "Acme hires engineers for the ingestion platform.".to_string();

        let prompt = build_research_prompt(&session);
        assert!(prompt.contains("company 'Acme'"));
        assert!(prompt.contains("'Engineer' role"));
        assert!(prompt.contains("ingestion platform"));
        assert!(prompt.contains("Industry trends"));
    }
}
