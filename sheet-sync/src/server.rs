//! HTTP surface: `GET /sync` triggers one run, `GET /healthz` for probes

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use log::{error, info};

use crate::config::Config;
use crate::sync::{SyncError, Syncer};

pub const SYNC_SUCCESS: &str = "Data synced to Webflow successfully";
pub const SYNC_FAILURE: &str = "Error syncing data";

/// State shared by all handlers
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub http: reqwest::Client,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/sync", get(sync))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn healthz() -> &'static str {
    "OK"
}

/// Run a full sync. Any failure collapses into the same generic 500.
pub async fn sync(State(state): State<Arc<ServerState>>) -> (StatusCode, &'static str) {
    match Syncer::new(&state.http, &state.config).run().await {
        Ok(report) => {
            info!(
                "Sync complete: {} of {} records published",
                report.published, report.records
            );
            (StatusCode::OK, SYNC_SUCCESS)
        }
        Err(err) => {
            error!("{}", failure_log_line(err));
            (StatusCode::INTERNAL_SERVER_ERROR, SYNC_FAILURE)
        }
    }
}

/// Log line for a failed run, including every underlying cause
fn failure_log_line(err: SyncError) -> String {
    format!("Sync failed: {:#}", anyhow::Error::new(err))
}

/// Serve until Ctrl-C
pub async fn serve(state: Arc<ServerState>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on port {}", state.config.port);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
