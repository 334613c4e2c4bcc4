//! ripple-server binary: wire config, client, engine, decision log, and
//! the axum router together, then serve.

mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod state;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use ripple_analysis::ImpactEngine;
use ripple_source::GraphSourceClient;
use ripple_storage::DecisionLog;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ripple=debug".into()),
        )
        .init();

    let config = Arc::new(config::load().context("failed to load configuration")?);
    tracing::info!(
        upstream = %config.upstream_base_url,
        listen = %config.effective_listen_addr(),
        "starting ripple-server"
    );

    let source = Arc::new(GraphSourceClient::new(&config)?);
    let engine = Arc::new(ImpactEngine::new(source, Arc::clone(&config)));
    let decisions = Arc::new(
        DecisionLog::open(Path::new(&config.effective_decision_log_path()))
            .context("failed to open decision log")?,
    );

    let state = AppState { engine, decisions };
    let app = routes::router(state);

    let addr = config.effective_listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
