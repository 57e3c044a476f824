//! Live Athena integration tests.
//!
//! These tests run real queries and are skipped unless
//! ATHENA_TEST_OUTPUT_LOCATION (an s3:// prefix the caller can write to) is
//! set. ATHENA_TEST_DATABASE defaults to `default`; the region comes from the
//! usual AWS environment.

use athena_dashboard::engine::AthenaEngine;
use athena_dashboard::error::DashboardError;
use athena_dashboard::query::{PollPolicy, QueryRunner, ResultFetcher};
use athena_dashboard::storage::S3Store;
use std::time::Duration;

struct LiveEnv {
    engine: AthenaEngine,
    store: S3Store,
    database: String,
    output_location: String,
}

/// Helper to build live clients from the environment.
async fn live_env() -> Option<LiveEnv> {
    let output_location = std::env::var("ATHENA_TEST_OUTPUT_LOCATION").ok()?;
    let database = std::env::var("ATHENA_TEST_DATABASE").unwrap_or_else(|_| "default".to_string());
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    Some(LiveEnv {
        engine: AthenaEngine::from_conf(&sdk_config),
        store: S3Store::from_conf(&sdk_config),
        database,
        output_location,
    })
}

fn policy() -> PollPolicy {
    PollPolicy::new(Duration::from_secs(1), 120)
}

#[tokio::test]
async fn test_live_select_literal() {
    let Some(env) = live_env().await else {
        eprintln!("Skipping test: ATHENA_TEST_OUTPUT_LOCATION not set");
        return;
    };

    let runner = QueryRunner::new(&env.engine, &env.database, &env.output_location, policy());
    let location = runner
        .execute("SELECT 'Alice' AS customer, '120.50' AS total_sales")
        .await
        .unwrap();
    let result = ResultFetcher::new(&env.store).fetch(&location).await.unwrap();

    assert_eq!(result.header, vec!["customer", "total_sales"]);
    assert_eq!(result.rows, vec![vec!["Alice", "120.50"]]);
}

#[tokio::test]
async fn test_live_invalid_query_fails() {
    let Some(env) = live_env().await else {
        eprintln!("Skipping test: ATHENA_TEST_OUTPUT_LOCATION not set");
        return;
    };

    let runner = QueryRunner::new(&env.engine, &env.database, &env.output_location, policy());
    let result = runner
        .execute("SELECT * FROM table_that_does_not_exist_4f1c")
        .await;

    match result {
        Err(DashboardError::Execution { reason, .. }) => assert!(!reason.is_empty()),
        Err(e) => panic!("Expected Execution error, got {e}"),
        Ok(location) => panic!("Expected failure, got results at {location}"),
    }
}
