//! prompt-compress HTTP API server (Axum).
//!
//! Endpoints for prompt optimization, validation, token estimation and
//! catalog inspection, plus health monitoring.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;
use std::net::SocketAddr;

/// Build the application router with the built-in pipeline.
pub fn app() -> Router {
    app_with_state(AppState::new())
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::api_routes())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, catalog_version = state.pipeline.catalog().version(), "listening");
    axum::serve(listener, app_with_state(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests;
