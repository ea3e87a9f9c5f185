use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Row-level generation failures never reach this type; they are folded into
/// the affected draft's body instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The spreadsheet could not be read at all. No partial drafts are returned.
    #[error("Sheet unavailable: {0}")]
    SheetUnavailable(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// JSON body extractor whose rejections render as `AppError::Validation`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::SheetUnavailable(msg) => {
                tracing::error!("Sheet retrieval failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "drafts": [], "resume_link": "", "error": msg }),
                )
            }
            AppError::Delivery(msg) => {
                tracing::error!("Email delivery failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "error": msg }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
