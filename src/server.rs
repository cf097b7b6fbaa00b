//! Prometheus exposition endpoint
//!
//! Serves the publisher's registry in text format on `/metrics` and `/`.

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const CONTENT_TYPE_TEXT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Bind the exposition endpoint on all interfaces
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics endpoint to {}", addr))
}

/// Routes for the exposition endpoint
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/", get(render_metrics))
        .route("/metrics", get(render_metrics))
        .with_state(handle)
}

async fn render_metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE_TEXT)], handle.render())
}

/// Serve scrapes until `cancel` fires
pub async fn serve(
    listener: TcpListener,
    handle: PrometheusHandle,
    cancel: CancellationToken,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Metrics exposed on http://{}/metrics", addr);
    }

    axum::serve(listener, router(handle))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("Metrics server error")
}
