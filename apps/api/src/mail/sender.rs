//! Mail Sender: dispatches one reviewed email through the agent's Gmail tool.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agent::prompts::{render_template, GMAIL_SEND_TOOL, SEND_EMAIL_QUERY_TEMPLATE};
use crate::agent::{Agent, AgentError};
use crate::errors::AppError;

/// Incoming email as submitted by the reviewer. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// An email that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendReceipt {
    pub raw: String,
}

impl EmailRequest {
    /// Rejects the request if any field is missing or blank.
    pub fn validate(self) -> Result<OutgoingEmail, AppError> {
        match (filled(self.to), filled(self.subject), filled(self.body)) {
            (Some(to), Some(subject), Some(body)) => Ok(OutgoingEmail { to, subject, body }),
            _ => Err(AppError::Validation(
                "to, subject, body are required".to_string(),
            )),
        }
    }
}

fn filled(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

pub async fn send_email(agent: &dyn Agent, email: &OutgoingEmail) -> Result<SendReceipt, AgentError> {
    let query = render_template(
        SEND_EMAIL_QUERY_TEMPLATE,
        &[
            ("to", email.to.as_str()),
            ("subject", email.subject.as_str()),
            ("body", email.body.as_str()),
        ],
    );

    match agent.run(&query, &[GMAIL_SEND_TOOL]).await {
        Ok(run) => {
            info!("Email sent to {}", email.to);
            Ok(SendReceipt {
                raw: run.final_output_text().unwrap_or_default(),
            })
        }
        Err(e) => {
            warn!("Email to {} failed: {e}", email.to);
            Err(e)
        }
    }
}
