//! Draft Assembler: turns sheet rows into reviewable email drafts.
//!
//! Flow: fetch_sheet_rows → resolve_rows → load_resume → (per row) normalize →
//!       render prompt → agent generation → Draft.
//!
//! Generation failures are soft: the row keeps its draft with a diagnostic body
//! so the reviewer can see it and regenerate. Only a sheet that cannot be read
//! at all fails the whole request.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::drafts::models::{Draft, DraftBatch, ResumeContext};
use crate::drafts::normalizer::normalize;
use crate::drafts::prompts::{render_email_prompt, subject_line};
use crate::drafts::sheet::{fetch_sheet_rows, resolve_rows};
use crate::errors::AppError;
use crate::resume::{load_resume, ResumeSource};

/// Prefix of the body written when generation fails for a row.
pub const GENERATION_FAILED_PREFIX: &str = "[LLM generation failed: ";

/// Runs the full generate-drafts operation for one sheet.
pub async fn generate_drafts(
    agent: &dyn Agent,
    resume_source: &dyn ResumeSource,
    sheet_id: &str,
    resume_id: &str,
) -> Result<DraftBatch, AppError> {
    info!("Fetching rows for sheet {sheet_id}");
    let output = fetch_sheet_rows(agent, sheet_id)
        .await
        .map_err(|e| AppError::SheetUnavailable(format!("Failed to fetch Google Sheet rows: {e}")))?;

    let rows = resolve_rows(output);
    info!("Sheet {sheet_id} returned {} rows", rows.len());

    let resume = load_resume(resume_source, resume_id).await;
    let drafts = build_drafts(agent, &rows, &resume).await;

    info!("Assembled {} drafts for sheet {sheet_id}", drafts.len());

    Ok(DraftBatch {
        drafts,
        resume_link: resume.link,
    })
}

/// Builds one draft per object row, in input order. Non-object rows are dropped.
pub async fn build_drafts(agent: &dyn Agent, rows: &[Value], resume: &ResumeContext) -> Vec<Draft> {
    let mut drafts = Vec::with_capacity(rows.len());

    for (index, raw) in rows.iter().enumerate() {
        let Some(raw) = raw.as_object() else {
            debug!("Skipping row {index}: not an object");
            continue;
        };

        let row = normalize(raw);
        let prompt = render_email_prompt(&row, resume);

        let body = match agent.run(&prompt, &[]).await {
            Ok(run) => run
                .final_output_text()
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
            Err(e) => {
                warn!("Generation failed for row {index} ({}): {e}", row.company);
                format!("{GENERATION_FAILED_PREFIX}{e}]")
            }
        };

        let subject = subject_line(&row);
        drafts.push(Draft {
            company: row.company,
            hr_email: row.hr_email,
            job_role: row.job_role,
            subject,
            body,
            resume_link: resume.link.clone(),
        });
    }

    drafts
}
