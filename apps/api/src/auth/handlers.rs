use axum::{extract::State, Json};

use crate::auth::resolver::{check_auth, AuthStatus};
use crate::state::AppState;

/// POST /check-auth (alias: POST /start-auth)
///
/// Reports whether Gmail sending is authorized. When it is not, `auth_url` carries
/// the consent link the user must open, if one could be found.
pub async fn handle_check_auth(State(state): State<AppState>) -> Json<AuthStatus> {
    Json(check_auth(state.agent.as_ref(), &state.hooks).await)
}
