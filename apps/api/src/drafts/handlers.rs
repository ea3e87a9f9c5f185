//! Axum route handlers for draft generation.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::drafts::assembler::generate_drafts;
use crate::drafts::models::DraftBatch;
use crate::errors::{AppError, AppJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateDraftsRequest {
    #[serde(default)]
    pub sheet_id: Option<String>,
    #[serde(default)]
    pub resume_id: Option<String>,
}

/// POST /generate-drafts
///
/// Reads every row of the sheet and drafts one email per row.
/// Drafts are returned for review only; nothing is sent.
pub async fn handle_generate_drafts(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateDraftsRequest>,
) -> Result<Json<DraftBatch>, AppError> {
    let sheet_id = request
        .sheet_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("sheet_id is required".to_string()))?;
    let resume_id = request.resume_id.as_deref().map(str::trim).unwrap_or("");

    let batch = generate_drafts(
        state.agent.as_ref(),
        state.resume_source.as_ref(),
        sheet_id,
        resume_id,
    )
    .await?;

    Ok(Json(batch))
}
