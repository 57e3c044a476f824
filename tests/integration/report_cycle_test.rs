//! Report cycle integration tests.
//!
//! Runs the full submit → poll → fetch → parse → render path against the
//! in-memory engine and object store.

use std::sync::Arc;

use athena_dashboard::config::Config;
use athena_dashboard::engine::{ExecutionId, ExecutionState, ExecutionStatus, ScriptedEngine};
use athena_dashboard::error::DashboardError;
use athena_dashboard::report::{Dashboard, ReportDefinition};
use athena_dashboard::storage::MemoryStore;
use pretty_assertions::assert_eq;

const SALES_CSV: &str = "\"customer\",\"total_sales\"\n\"Alice\",\"120.50\"\n\"Bob\",\"75.00\"";

fn running() -> ExecutionStatus {
    ExecutionStatus::new(ExecutionState::Running)
}

/// Config with fast polling and the given reports.
fn test_config(reports: Vec<ReportDefinition>) -> Config {
    let mut config = Config::default();
    config.athena.poll_interval_ms = 1;
    config.athena.max_poll_attempts = 5;
    config.reports = reports;
    config
}

/// Scenario: Successful report
/// Given an execution that reports RUNNING, RUNNING, SUCCEEDED
/// And the result object holds two customers
/// When the cycle runs
/// Then the section holds the header and both rows as strings
#[tokio::test]
async fn test_successful_report_yields_rows() {
    let config = test_config(vec![ReportDefinition::new(
        "1. Total Sales by Customer",
        "SELECT customer, SUM(amount) AS total_sales FROM \"{database}\".\"{table}\" GROUP BY customer",
    )]);
    let engine = Arc::new(ScriptedEngine::new().with_script(
        "total_sales",
        vec![
            running(),
            running(),
            ExecutionStatus::succeeded("s3://3awsassignment/enriched/q-1.csv"),
        ],
    ));
    let store = Arc::new(
        MemoryStore::new().with_object("s3://3awsassignment/enriched/q-1.csv", SALES_CSV),
    );

    let dashboard = Dashboard::new(&config, engine.clone(), store);
    let sections = dashboard.run_cycle().await;

    assert_eq!(sections.len(), 1);
    let result = sections[0].outcome.as_ref().unwrap();
    assert_eq!(result.header, vec!["customer", "total_sales"]);
    assert_eq!(
        result.rows,
        vec![vec!["Alice", "120.50"], vec!["Bob", "75.00"]]
    );
    assert_eq!(engine.poll_count(&ExecutionId::from("q-1")), 3);
}

/// Scenario: Mixed outcomes
/// Given one failing, one timing out, one unreadable and one good report
/// When the page renders
/// Then every section appears, in order, with its own outcome
#[tokio::test]
async fn test_page_renders_every_outcome() {
    let config = test_config(vec![
        ReportDefinition::new("Denied", "SELECT a FROM denied"),
        ReportDefinition::new("Slow", "SELECT a FROM slow"),
        ReportDefinition::new("Gone", "SELECT a FROM gone"),
        ReportDefinition::new("Good", "SELECT a FROM good"),
    ]);
    let engine = Arc::new(
        ScriptedEngine::new()
            .with_script(
                "denied",
                vec![ExecutionStatus::failed(Some("insufficient permissions"))],
            )
            .with_script("slow", vec![running()])
            .with_script("gone", vec![ExecutionStatus::succeeded("s3://out/gone.csv")])
            .with_script("good", vec![ExecutionStatus::succeeded("s3://out/good.csv")]),
    );
    let store = Arc::new(MemoryStore::new().with_object("s3://out/good.csv", "\"a\"\n\"<ok>\"\n"));

    let dashboard = Dashboard::new(&config, engine.clone(), store);
    let page = dashboard.render().await;

    let positions: Vec<usize> = ["Denied", "Slow", "Gone", "Good"]
        .iter()
        .map(|title| page.find(&format!("<h2>{title}</h2>")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(page.contains("Query q-1 failed (FAILED): insufficient permissions"));
    assert!(page.contains("Query q-2 did not finish after 5 status checks"));
    assert!(page.contains("Retrieval error: Failed to read s3://out/gone.csv"));
    assert!(page.contains("<td>&lt;ok&gt;</td>"));
    assert_eq!(page.matches("<p class=\"error\">").count(), 3);

    assert_eq!(engine.stopped(), vec![ExecutionId::from("q-2")]);
}

/// Scenario: Failed without a reason
/// Given an execution that fails without a state change reason
/// When the cycle runs
/// Then the section's error mentions the execution id and "Unknown error"
#[tokio::test]
async fn test_failure_without_reason() {
    let config = test_config(vec![ReportDefinition::new("R", "SELECT 1")]);
    let engine = Arc::new(
        ScriptedEngine::new().with_script("SELECT 1", vec![ExecutionStatus::failed(None)]),
    );
    let dashboard = Dashboard::new(&config, engine, Arc::new(MemoryStore::new()));

    let sections = dashboard.run_cycle().await;

    match &sections[0].outcome {
        Err(e @ DashboardError::Execution { .. }) => {
            assert!(e.to_string().contains("q-1"));
            assert!(e.to_string().contains("Unknown error"));
        }
        other => panic!("Expected Execution error, got {:?}", other),
    }
}

/// Scenario: Header-only result
/// Given a query whose output has a header and no data lines
/// When the cycle runs
/// Then the section succeeds with zero rows
#[tokio::test]
async fn test_header_only_result_is_success() {
    let config = test_config(vec![ReportDefinition::new("Empty", "SELECT status FROM t")]);
    let engine = Arc::new(
        ScriptedEngine::new()
            .with_script("status", vec![ExecutionStatus::succeeded("s3://out/empty.csv")]),
    );
    let store = Arc::new(MemoryStore::new().with_object("s3://out/empty.csv", "\"status\"\n"));
    let dashboard = Dashboard::new(&config, engine, store);

    let sections = dashboard.run_cycle().await;

    let result = sections[0].outcome.as_ref().unwrap();
    assert_eq!(result.header, vec!["status"]);
    assert!(result.is_empty());
}

/// Scenario: Ragged result
/// Given an output object with a row shorter than the header
/// When the cycle runs
/// Then the section fails with a parse error
#[tokio::test]
async fn test_ragged_result_is_parse_error() {
    let config = test_config(vec![ReportDefinition::new("Ragged", "SELECT a, b FROM t")]);
    let engine = Arc::new(
        ScriptedEngine::new()
            .with_script("a, b", vec![ExecutionStatus::succeeded("s3://out/r.csv")]),
    );
    let store = Arc::new(
        MemoryStore::new().with_object("s3://out/r.csv", "\"a\",\"b\"\n\"1\",\"2\"\n\"3\"\n"),
    );
    let dashboard = Dashboard::new(&config, engine, store);

    let sections = dashboard.run_cycle().await;

    assert!(matches!(sections[0].outcome, Err(DashboardError::Parse(_))));
}

/// Scenario: Default reports
/// Given the built-in configuration
/// When the cycle runs against an engine that succeeds for every query
/// Then all five reports are submitted against the configured table
#[tokio::test]
async fn test_default_reports_are_submitted() {
    let mut config = Config::default();
    config.athena.poll_interval_ms = 1;
    let engine = Arc::new(ScriptedEngine::new().with_script(
        "\"orders_db\".\"processed\"",
        vec![ExecutionStatus::succeeded("s3://3awsassignment/enriched/any.csv")],
    ));
    let store = Arc::new(
        MemoryStore::new().with_object("s3://3awsassignment/enriched/any.csv", "\"n\"\n\"1\"\n"),
    );
    let dashboard = Dashboard::new(&config, engine.clone(), store);

    let sections = dashboard.run_cycle().await;

    assert_eq!(sections.len(), 5);
    assert!(sections.iter().all(|s| s.is_success()));
    let submissions = engine.submissions();
    assert_eq!(submissions.len(), 5);
    assert!(submissions.iter().all(|s| s.database == "orders_db"));
}
