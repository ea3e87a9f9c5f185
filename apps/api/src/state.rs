use std::sync::Arc;

use crate::agent::hooks::AuthHooks;
use crate::agent::Agent;
use crate::resume::ResumeSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide agent handle, created once at startup.
    pub agent: Arc<dyn Agent>,
    /// Same hooks the agent client reports consent links to.
    pub hooks: Arc<AuthHooks>,
    pub resume_source: Arc<dyn ResumeSource>,
}
