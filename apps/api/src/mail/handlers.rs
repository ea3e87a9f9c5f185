//! Axum route handlers for sending reviewed drafts.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::mail::sender::{send_email, EmailRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub status: &'static str,
    pub raw: String,
}

#[derive(Debug, Deserialize)]
pub struct SendAllRequest {
    #[serde(default)]
    pub emails: Vec<EmailRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    Sent,
    Error,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct SendResult {
    pub to: Option<String>,
    pub status: SendOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendAllResponse {
    pub results: Vec<SendResult>,
}

/// POST /send-email
///
/// Sends one reviewed email. Incomplete requests are rejected before the mail tool runs.
pub async fn handle_send_email(
    State(state): State<AppState>,
    AppJson(request): AppJson<EmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let email = request.validate()?;

    let receipt = send_email(state.agent.as_ref(), &email)
        .await
        .map_err(|e| AppError::Delivery(e.to_string()))?;

    Ok(Json(SendEmailResponse {
        status: "sent",
        raw: receipt.raw,
    }))
}

/// POST /send-all
///
/// Sends each email in order. Incomplete entries are skipped and failures are
/// reported per entry; neither stops the remaining sends.
pub async fn handle_send_all(
    State(state): State<AppState>,
    AppJson(request): AppJson<SendAllRequest>,
) -> Json<SendAllResponse> {
    let mut results = Vec::with_capacity(request.emails.len());

    for entry in request.emails {
        let to = entry.to.clone();
        let result = match entry.validate() {
            Err(e) => SendResult {
                to,
                status: SendOutcome::Skipped,
                raw: None,
                error: Some(e.to_string()),
            },
            Ok(email) => match send_email(state.agent.as_ref(), &email).await {
                Ok(receipt) => SendResult {
                    to,
                    status: SendOutcome::Sent,
                    raw: Some(receipt.raw),
                    error: None,
                },
                Err(e) => SendResult {
                    to,
                    status: SendOutcome::Error,
                    raw: None,
                    error: Some(e.to_string()),
                },
            },
        };
        results.push(result);
    }

    let sent = results
        .iter()
        .filter(|r| r.status == SendOutcome::Sent)
        .count();
    info!("Batch send finished: {sent}/{} sent", results.len());

    Json(SendAllResponse { results })
}
