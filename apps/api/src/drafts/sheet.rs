//! Sheet rows: retrieval through the agent and tolerance for the shapes it returns.
//!
//! The Sheets tool may answer with a flat list of rows or with an object keyed by
//! sheet name. Its output shape is not fixed, so the precedence below is kept exactly.

use serde_json::Value;

use crate::agent::prompts::{render_template, FETCH_ROWS_QUERY_TEMPLATE, SHEETS_GET_TOOL};
use crate::agent::{Agent, AgentError};

const PRIMARY_SHEET: &str = "Sheet1";

/// Asks the agent for every row of the sheet. Returns the raw output value
/// (`Null` when the run produced none).
pub async fn fetch_sheet_rows(agent: &dyn Agent, sheet_id: &str) -> Result<Value, AgentError> {
    let query = render_template(FETCH_ROWS_QUERY_TEMPLATE, &[("sheet_id", sheet_id)]);
    let run = agent.run(&query, &[SHEETS_GET_TOOL]).await?;
    Ok(run.final_output().cloned().unwrap_or(Value::Null))
}

/// Picks the row list out of the tool output.
///
/// Order: a list is used as-is; for an object, `"Sheet1"` exactly, then any key equal
/// to `"sheet1"` ignoring case, then the first value if it is a list. Everything else
/// yields no rows.
pub fn resolve_rows(output: Value) -> Vec<Value> {
    match output {
        Value::Array(rows) => rows,
        Value::Object(mut sheets) => {
            let named = match sheets.remove(PRIMARY_SHEET) {
                Some(sheet) => Some(sheet),
                None => {
                    let key = sheets
                        .keys()
                        .find(|k| k.eq_ignore_ascii_case(PRIMARY_SHEET))
                        .cloned();
                    key.and_then(|k| sheets.remove(&k))
                }
            };

            let sheet = match named {
                Some(sheet) => sheet,
                None => match sheets.into_iter().next() {
                    Some((_, first)) => first,
                    None => return Vec::new(),
                },
            };

            match sheet {
                Value::Array(rows) => rows,
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}
