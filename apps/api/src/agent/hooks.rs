use std::sync::Mutex;

use tracing::info;

/// Side channel the agent client reports login links through.
///
/// The agent service may surface a consent URL only as a clarification and never
/// in the run's final output, so the most recent URL is kept here for the auth check.
#[derive(Debug, Default)]
pub struct AuthHooks {
    last_auth_url: Mutex<Option<String>>,
}

impl AuthHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_auth_url(&self, url: &str) {
        info!("Auth URL captured: {url}");
        let mut slot = self
            .last_auth_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(url.to_string());
    }

    pub fn last_auth_url(&self) -> Option<String> {
        self.last_auth_url
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
