//! HTTP server exposing the dashboard.
//!
//! A single route, `GET /`, runs the full report cycle and returns the page.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::report::Dashboard;

/// Builds the application router.
pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index))
        .with_state(dashboard)
}

async fn index(State(dashboard): State<Arc<Dashboard>>) -> Html<String> {
    Html(dashboard.render().await)
}

/// Serves the dashboard on an already bound listener until the process ends.
pub async fn serve(listener: TcpListener, dashboard: Arc<Dashboard>) -> Result<()> {
    axum::serve(listener, router(dashboard))
        .await
        .map_err(|e| DashboardError::server(format!("Server stopped: {e}")))
}

/// Binds `addr` and serves the dashboard.
pub async fn run(addr: SocketAddr, dashboard: Arc<Dashboard>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DashboardError::server(format!("Failed to bind {addr}: {e}")))?;

    let local = listener
        .local_addr()
        .map_err(|e| DashboardError::server(format!("Failed to read bound address: {e}")))?;
    info!("Serving dashboard on http://{}", local);

    serve(listener, dashboard).await
}
