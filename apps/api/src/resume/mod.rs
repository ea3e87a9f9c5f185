//! Resume loading: downloads the resume PDF from Google Drive and extracts its text.
//!
//! Text extraction is delegated to `pdf-extract`. The resume is loaded once per
//! generate-drafts request and shared by every row.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{info, warn};

use crate::drafts::models::ResumeContext;

/// Fetches a document by file id and returns its plain text.
#[async_trait]
pub trait ResumeSource: Send + Sync {
    async fn fetch_text(&self, file_id: &str) -> Result<String>;
}

/// Public Google Drive download of a PDF resume.
pub struct DriveResumeSource {
    client: Client,
}

impl DriveResumeSource {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client for resume downloads")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResumeSource for DriveResumeSource {
    async fn fetch_text(&self, file_id: &str) -> Result<String> {
        let bytes: Bytes = self
            .client
            .get("https://drive.google.com/uc")
            .query(&[("id", file_id), ("export", "download")])
            .send()
            .await
            .context("Resume download request failed")?
            .error_for_status()
            .context("Resume download was rejected")?
            .bytes()
            .await
            .context("Failed to read resume body")?;

        info!("Downloaded resume {file_id} ({} bytes)", bytes.len());

        // Parsing is CPU-bound and pdf-extract may panic on malformed input;
        // a panic surfaces here as a JoinError.
        tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .context("Resume text extraction was aborted")?
    }
}

/// Extracts text page by page; blank pages contribute nothing.
pub fn extract_pdf_text(pdf: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf)
        .map_err(|e| anyhow::anyhow!("PDF text extraction failed: {e}"))?;
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(|page| format!("{page}\n"))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn drive_view_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{file_id}/view")
}

/// Loads resume text and link for `resume_id`. An empty id, or any download or
/// extraction failure, yields an empty context rather than an error.
pub async fn load_resume(source: &dyn ResumeSource, resume_id: &str) -> ResumeContext {
    if resume_id.is_empty() {
        return ResumeContext::default();
    }

    match source.fetch_text(resume_id).await {
        Ok(text) => ResumeContext {
            text,
            link: drive_view_link(resume_id),
        },
        Err(e) => {
            warn!("Could not load resume {resume_id}, continuing without it: {e:#}");
            ResumeContext::default()
        }
    }
}
