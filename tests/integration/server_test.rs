//! HTTP server integration tests.
//!
//! Serves the dashboard on an ephemeral port and requests it over a real
//! socket.

use std::net::SocketAddr;
use std::sync::Arc;

use athena_dashboard::config::Config;
use athena_dashboard::engine::{ExecutionState, ExecutionStatus, ScriptedEngine};
use athena_dashboard::report::{Dashboard, ReportDefinition};
use athena_dashboard::server;
use athena_dashboard::storage::MemoryStore;
use tokio::net::TcpListener;

/// Starts a server for `dashboard` and returns its address.
async fn spawn_server(dashboard: Dashboard) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, Arc::new(dashboard)));
    addr
}

fn sales_dashboard() -> (Dashboard, Arc<ScriptedEngine>) {
    let mut config = Config::default();
    config.title = "Athena Orders Dashboard".to_string();
    config.athena.poll_interval_ms = 1;
    config.reports = vec![
        ReportDefinition::new(
            "1. Total Sales by Customer",
            "SELECT customer, SUM(amount) AS total_sales FROM \"{database}\".\"{table}\"",
        ),
        ReportDefinition::new(
            "3. Order Status Dashboard",
            "SELECT status FROM \"{database}\".\"{table}\"",
        ),
    ];

    let engine = Arc::new(
        ScriptedEngine::new()
            .with_script(
                "total_sales",
                vec![
                    ExecutionStatus::new(ExecutionState::Running),
                    ExecutionStatus::succeeded("s3://3awsassignment/enriched/sales.csv"),
                ],
            )
            .with_script(
                "status",
                vec![ExecutionStatus::failed(Some("TABLE_NOT_FOUND"))],
            ),
    );
    let store = Arc::new(MemoryStore::new().with_object(
        "s3://3awsassignment/enriched/sales.csv",
        "\"customer\",\"total_sales\"\n\"Alice\",\"120.50\"\n\"Bob\",\"75.00\"\n",
    ));

    (Dashboard::new(&config, engine.clone(), store), engine)
}

#[tokio::test]
async fn test_index_returns_dashboard() {
    let (dashboard, engine) = sales_dashboard();
    let addr = spawn_server(dashboard).await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = response.text().await.unwrap();
    assert!(body.contains("<h1>📊 Athena Orders Dashboard</h1>"));
    assert!(body.contains("<h2>1. Total Sales by Customer</h2>"));
    assert!(body.contains("<tr><td>Alice</td><td>120.50</td></tr>"));
    assert!(body.contains("<h2>3. Order Status Dashboard</h2>"));
    assert!(body.contains("failed (FAILED): TABLE_NOT_FOUND"));

    assert_eq!(engine.submissions().len(), 2);
}

#[tokio::test]
async fn test_each_request_runs_a_new_cycle() {
    let (dashboard, engine) = sales_dashboard();
    let addr = spawn_server(dashboard).await;

    for _ in 0..2 {
        let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert!(response.status().is_success());
    }

    assert_eq!(engine.submissions().len(), 4);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (dashboard, engine) = sales_dashboard();
    let addr = spawn_server(dashboard).await;

    let response = reqwest::get(format!("http://{addr}/reports")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(engine.submissions().is_empty());
}
