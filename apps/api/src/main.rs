mod agent;
mod auth;
mod config;
mod drafts;
mod errors;
mod mail;
mod resume;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::hooks::AuthHooks;
use crate::agent::AgentClient;
use crate::config::Config;
use crate::resume::DriveResumeSource;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Outreach API v{}", env!("CARGO_PKG_VERSION"));

    // One agent handle for the whole process; consent links flow into `hooks`.
    let hooks = Arc::new(AuthHooks::new());
    let agent = AgentClient::new(&config, hooks.clone())
        .context("Failed to initialize agent client")?;
    info!(
        "Agent client initialized ({}, model: {})",
        config.agent_api_url,
        agent.model()
    );

    let resume_source = DriveResumeSource::new(config.agent_timeout_secs)?;

    let state = AppState {
        agent: Arc::new(agent),
        hooks,
        resume_source: Arc::new(resume_source),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
