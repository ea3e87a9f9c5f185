// Tool identifiers and fixed queries sent to the agent service.
// Draft-generation prompts live in drafts::prompts.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Gmail send tool. Also used for the auth check since it needs the same scope.
pub const GMAIL_SEND_TOOL: &str = "portia:google:gmail:send_email";

/// Google Sheets read tool.
pub const SHEETS_GET_TOOL: &str = "portia:google:sheets:get_spreadsheet";

/// Marker the agent replies with when Gmail credentials are already valid.
pub const AUTH_OK_MARKER: &str = "AUTH_OK";

pub const AUTH_CHECK_QUERY: &str = "Check if Gmail is authenticated. \
    If authenticated reply exactly AUTH_OK. \
    Otherwise return the Google OAuth URL that the user must open.";

/// Replace `{sheet_id}` before sending.
pub const FETCH_ROWS_QUERY_TEMPLATE: &str =
    "Retrieve all rows from the Google Sheet with ID {sheet_id}.";

/// Replace `{to}`, `{subject}`, `{body}` before sending.
pub const SEND_EMAIL_QUERY_TEMPLATE: &str = "Send an email using Gmail:
To: {to}
Subject: {subject}
Body:
{body}";


fn re_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"))
}

/// Fills `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are never rescanned, so braces inside them come through
/// verbatim. Placeholders without a value are left as written.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    re_placeholder()
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
