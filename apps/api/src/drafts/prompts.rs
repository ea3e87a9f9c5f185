// Prompt template and fallbacks for draft generation.

use crate::agent::prompts::render_template;
use crate::drafts::models::{CanonicalRow, ResumeContext};

/// Upper bound on the generated body, stated to the model.
pub const WORD_LIMIT: u32 = 200;

/// Resume text beyond this many characters is cut before prompting.
pub const MAX_RESUME_CHARS: usize = 12_000;

pub const COMPANY_PROMPT_FALLBACK: &str = "the company";
pub const ROLE_FALLBACK: &str = "the role";
pub const COMPANY_SUBJECT_FALLBACK: &str = "Company";

/// Email body prompt.
/// Replace: {word_limit}, {company}, {job_role}, {resume_link}, {resume_text}
pub const EMAIL_PROMPT_TEMPLATE: &str = r#"You are an expert job application writer.
Write a concise ({word_limit} words max) professional email for:
Company: {company}
Role: {job_role}

Use relevant skills/projects from this resume to tailor the pitch:
{resume_text}

Rules:
- DO NOT include a subject line in the body.
- No meta text ("here's your email", etc.).
- Mention the company/role naturally.
- Close with a signature on separate lines (parsed from resume if possible):
  Full Name
  Email
  Phone
  LinkedIn (if present)
- End with: "I have attached my resume for your review: {resume_link}"

Output only the final email body in plain text."#;

/// Fills the template for one row in a single pass; braces inside row values or
/// the resume are never mistaken for placeholders.
pub fn render_email_prompt(row: &CanonicalRow, resume: &ResumeContext) -> String {
    let company = non_empty_or(&row.company, COMPANY_PROMPT_FALLBACK);
    let job_role = non_empty_or(&row.job_role, ROLE_FALLBACK);
    let resume_text: String = resume.text.chars().take(MAX_RESUME_CHARS).collect();
    let word_limit = WORD_LIMIT.to_string();

    render_template(
        EMAIL_PROMPT_TEMPLATE,
        &[
            ("word_limit", word_limit.as_str()),
            ("company", company),
            ("job_role", job_role),
            ("resume_link", resume.link.as_str()),
            ("resume_text", resume_text.as_str()),
        ],
    )
}

/// Deterministic subject line; never depends on model output.
pub fn subject_line(row: &CanonicalRow) -> String {
    format!(
        "Job Application - {} at {}",
        non_empty_or(&row.job_role, ROLE_FALLBACK),
        non_empty_or(&row.company, COMPANY_SUBJECT_FALLBACK)
    )
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(company: &str, job_role: &str) -> CanonicalRow {
        CanonicalRow {
            company: company.to_string(),
            job_role: job_role.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_substitutes_all_placeholders() {
        let resume = ResumeContext {
            text: "Rust, Kafka, 5 years backend".to_string(),
            link: "https://drive.google.com/file/d/abc/view".to_string(),
        };
        let prompt = render_email_prompt(&row("Acme", "Engineer"), &resume);

        assert!(prompt.contains("(200 words max)"));
        assert!(prompt.contains("Company: Acme\nRole: Engineer"));
        assert!(prompt.contains("Rust, Kafka, 5 years backend"));
        assert!(prompt.contains(
            "I have attached my resume for your review: https://drive.google.com/file/d/abc/view"
        ));
        assert!(!prompt.contains("{company}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_prompt_uses_fallbacks_for_empty_fields() {
        let prompt = render_email_prompt(&row("", ""), &ResumeContext::default());
        assert!(prompt.contains("Company: the company\nRole: the role"));
    }

    #[test]
    fn test_resume_text_is_truncated() {
        let resume = ResumeContext {
            text: format!("{}{}", "a".repeat(MAX_RESUME_CHARS), "TAIL"),
            link: String::new(),
        };
        let prompt = render_email_prompt(&row("Acme", "Engineer"), &resume);
        assert!(prompt.contains(&"a".repeat(MAX_RESUME_CHARS)));
        assert!(!prompt.contains("TAIL"));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let resume = ResumeContext {
            text: "é".repeat(MAX_RESUME_CHARS + 5),
            link: String::new(),
        };
        let prompt = render_email_prompt(&row("Acme", "Engineer"), &resume);
        assert_eq!(prompt.matches('é').count(), MAX_RESUME_CHARS);
    }

    #[test]
    fn test_braces_in_resume_are_left_alone() {
        let resume = ResumeContext {
            text: "Built {company} templating".to_string(),
            link: String::new(),
        };
        let prompt = render_email_prompt(&row("Acme", "Engineer"), &resume);
        assert!(prompt.contains("Built {company} templating"));
    }

    #[test]
    fn test_placeholders_in_row_values_are_left_alone() {
        let resume = ResumeContext {
            text: "SECRET RESUME".to_string(),
            link: "https://drive.google.com/file/d/{company}/view".to_string(),
        };
        let prompt = render_email_prompt(&row("{resume_text} Inc", "{resume_link} lead"), &resume);

        assert!(prompt.contains("Company: {resume_text} Inc\nRole: {resume_link} lead"));
        assert!(prompt.contains("review: https://drive.google.com/file/d/{company}/view"));
        assert_eq!(prompt.matches("SECRET RESUME").count(), 1);
    }

    #[test]
    fn test_subject_line() {
        assert_eq!(
            subject_line(&row("Acme", "Engineer")),
            "Job Application - Engineer at Acme"
        );
        assert_eq!(subject_line(&row("", "")), "Job Application - the role at Company");
    }
}
