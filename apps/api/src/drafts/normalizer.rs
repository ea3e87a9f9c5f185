//! Row Normalizer: maps whatever column headers a sheet uses onto `CanonicalRow`.

use serde_json::{Map, Value};

use crate::drafts::models::CanonicalRow;

/// Candidate headers in precedence order. The first non-empty cell wins.
const COMPANY_KEYS: [&str; 4] = ["Company", "company", "COMPANY", "company_name"];
const HR_EMAIL_KEYS: [&str; 4] = ["HR Email", "hr_email", "HR_Email", "Email"];
const JOB_ROLE_KEYS: [&str; 4] = ["Job Role", "job_role", "Role", "JobRole"];

/// Normalizes a raw sheet row. Total: every mapping yields a complete row,
/// with `""` for any field none of the candidate headers supplied.
pub fn normalize(raw: &Map<String, Value>) -> CanonicalRow {
    CanonicalRow {
        company: first_filled(raw, &COMPANY_KEYS),
        hr_email: first_filled(raw, &HR_EMAIL_KEYS),
        job_role: first_filled(raw, &JOB_ROLE_KEYS),
        subject: raw.get("subject").cloned(),
        body: raw.get("body").cloned(),
    }
}

fn first_filled(raw: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(cell_text)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

/// Text of a cell that counts as filled. Emptiness is judged before trimming,
/// so a whitespace-only cell still shadows later candidates.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
