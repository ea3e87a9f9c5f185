/// Agent Client: the single handle to the external agent-orchestration service.
///
/// ARCHITECTURAL RULE: No other module may call the agent service directly.
/// Sheet retrieval, Gmail auth checks, email dispatch and draft generation all
/// run as agent queries through the `Agent` trait.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod hooks;
pub mod prompts;

use hooks::AuthHooks;

const UNPROCESSABLE_ENTITY: u16 = 422;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The agent could not build or execute a plan for the query.
    #[error("{0}")]
    Plan(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Run result object
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    #[default]
    NotStarted,
    InProgress,
    NeedClarification,
    Complete,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Result of one agent run. Treated as opaque by callers apart from
/// `final_output_text` and `dump_json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRun {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub state: RunState,
    #[serde(default)]
    pub outputs: RunOutputs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutputs {
    #[serde(default)]
    pub final_output: Option<RunOutput>,
    #[serde(default)]
    pub clarifications: Vec<Clarification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutput {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// A request for human action raised during a run (e.g. an OAuth consent link).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clarification {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub user_guidance: Option<String>,
}

impl AgentRun {
    /// The final output value, if the run produced a non-null one.
    pub fn final_output(&self) -> Option<&Value> {
        self.outputs
            .final_output
            .as_ref()
            .and_then(|o| o.value.as_ref())
            .filter(|v| !v.is_null())
    }

    /// The final output rendered as text. Strings are returned verbatim,
    /// any other JSON value in its compact serialized form.
    pub fn final_output_text(&self) -> Option<String> {
        self.final_output().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Full serialized form of the run, used as a last-resort search target.
    pub fn dump_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Action URLs attached to the run's clarifications, in order.
    pub fn action_urls(&self) -> impl Iterator<Item = &str> {
        self.outputs
            .clarifications
            .iter()
            .filter_map(|c| c.action_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Agent trait + HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// Runs a natural-language query, optionally restricted to a tool allow-list.
/// An empty `tools` slice lets the agent answer with the model alone.
///
/// Carried in `AppState` as `Arc<dyn Agent>`.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, query: &str, tools: &[&str]) -> Result<AgentRun, AgentError>;
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    query: &'a str,
    tools: &'a [&'a str],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: ServiceErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: String,
}

/// HTTP client for the agent service. Created once at startup and shared.
#[derive(Clone)]
pub struct AgentClient {
    client: Client,
    base_url: String,
    api_key: String,
    llm_api_key: String,
    model: String,
    hooks: Arc<AuthHooks>,
}

impl AgentClient {
    pub fn new(config: &Config, hooks: Arc<AuthHooks>) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.agent_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.agent_api_url.trim_end_matches('/').to_string(),
            api_key: config.agent_api_key.clone(),
            llm_api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
            hooks,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Agent for AgentClient {
    async fn run(&self, query: &str, tools: &[&str]) -> Result<AgentRun, AgentError> {
        let request_body = RunRequest {
            query,
            tools,
            model: &self.model,
        };

        let response = self
            .client
            .post(format!("{}/runs", self.base_url))
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .header("X-LLM-Api-Key", &self.llm_api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(body);
            if status == UNPROCESSABLE_ENTITY {
                return Err(AgentError::Plan(message));
            }
            warn!("Agent service returned {status}: {message}");
            return Err(AgentError::Api { status, message });
        }

        let body = response.text().await?;
        let run: AgentRun = serde_json::from_str(&body)?;

        debug!(
            "Agent run {} finished: state={:?}, tools={:?}",
            run.id, run.state, tools
        );

        for url in run.action_urls() {
            self.hooks.on_auth_url(url);
        }

        Ok(run)
    }
}

/// Unwraps `{"error": {"message": ...}}` bodies; anything else is returned as-is.
fn error_message(body: String) -> String {
    serde_json::from_str::<ServiceError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
