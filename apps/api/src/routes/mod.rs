pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers::handle_check_auth;
use crate::drafts::handlers::handle_generate_drafts;
use crate::mail::handlers::{handle_send_all, handle_send_email};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/check-auth", post(handle_check_auth))
        // Legacy path still used by the review form.
        .route("/start-auth", post(handle_check_auth))
        .route("/generate-drafts", post(handle_generate_drafts))
        .route("/send-email", post(handle_send_email))
        .route("/send-all", post(handle_send_all))
        .with_state(state)
}
