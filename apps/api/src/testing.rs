//! Test doubles for the external collaborators.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agent::{Agent, AgentError, AgentRun};
use crate::resume::ResumeSource;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub query: String,
    pub tools: Vec<String>,
}

/// Agent that replays queued outcomes in order and records every call.
/// Once the queue is drained it answers with an empty completed run.
pub struct ScriptedAgent {
    outcomes: Mutex<VecDeque<Result<AgentRun, AgentError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedAgent {
    pub fn new(outcomes: Vec<Result<AgentRun, AgentError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn run(&self, query: &str, tools: &[&str]) -> Result<AgentRun, AgentError> {
        self.calls.lock().unwrap().push(RecordedCall {
            query: query.to_string(),
            tools: tools.iter().map(|t| t.to_string()).collect(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AgentRun::default()))
    }
}

/// A completed run whose final output is `value`.
pub fn output_run(value: Value) -> AgentRun {
    serde_json::from_value(json!({
        "id": "run-test",
        "state": "COMPLETE",
        "outputs": {"final_output": {"value": value}}
    }))
    .unwrap()
}

pub fn api_error(message: &str) -> AgentError {
    AgentError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Resume source returning fixed text, or failing when constructed with `None`.
pub struct StaticResumeSource {
    text: Option<String>,
    requested: Mutex<Vec<String>>,
}

impl StaticResumeSource {
    pub fn new(text: Option<&str>) -> Self {
        Self {
            text: text.map(str::to_string),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeSource for StaticResumeSource {
    async fn fetch_text(&self, file_id: &str) -> anyhow::Result<String> {
        self.requested.lock().unwrap().push(file_id.to_string());
        self.text
            .clone()
            .ok_or_else(|| anyhow::anyhow!("download failed for {file_id}"))
    }
}
