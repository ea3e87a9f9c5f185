use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A spreadsheet row with fixed field names, whatever the sheet's column headers were.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalRow {
    pub company: String,
    pub hr_email: String,
    pub job_role: String,
    /// Passed through verbatim for edit-and-resend rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Resume text and its shareable link. Both empty when no resume was given
/// or it could not be loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeContext {
    pub text: String,
    pub link: String,
}

/// An unsent, human-reviewable email produced from one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub company: String,
    pub hr_email: String,
    pub job_role: String,
    pub subject: String,
    pub body: String,
    pub resume_link: String,
}

/// Successful generate-drafts result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DraftBatch {
    pub drafts: Vec<Draft>,
    pub resume_link: String,
}
