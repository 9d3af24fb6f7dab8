//! HTTP backend answering `POST /extract_details` from the YouTube Data API.
mod api;
pub mod youtube;

use anyhow::Context;
use tokio::net::TcpListener;
use vidmeta_config::ServerConfig;

pub use api::{ApiError, AppState, HealthResponse, router};
pub use youtube::{YoutubeClient, extract_video_id, format_duration};

/// Bind `cfg.bind` and serve until Ctrl-C.
pub async fn serve(cfg: &ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(cfg)?;
    let listener = TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "server.listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated")?;

    tracing::info!("server.stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "server.ctrl_c.unavailable");
        std::future::pending::<()>().await;
    }
}
