//! terravue server entry point.
//!
//! Boots the catalogue MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use terravue_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing::info!(db_path = %config.db_path.display(), "Starting terravue server on stdio transport");

    let db = CacheDb::open(&config.db_path)
        .await
        .context("failed to open cache database")?;
    let state = state::AppState::from_config(db.clone(), &config)?;

    let handler = handler::TerraVueServer::new(Arc::new(state));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    if let Err(e) = db.close().await {
        tracing::warn!(error = %e, "failed to close cache database");
    }

    Ok(())
}
