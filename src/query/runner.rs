//! Query submission and completion polling.
//!
//! Provides isolated query execution that can be tested independently of
//! the report cycle and the HTTP server.

use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::{ExecutionState, QueryEngine};
use crate::error::{DashboardError, Result};
use crate::storage::ResultLocation;

/// Default delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of status checks before giving up on a query.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 300;

/// How often and how long to wait for a query to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between consecutive status checks.
    pub interval: Duration,
    /// Maximum number of status checks for one execution.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    /// Creates a policy with the given interval and attempt budget.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Upper bound on the time spent sleeping between checks.
    ///
    /// Saturates at `Duration::MAX` for budgets too large to represent.
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts.saturating_sub(1))
    }
}

/// Submits queries to an engine and waits for them to finish.
pub struct QueryRunner<'a> {
    engine: &'a dyn QueryEngine,
    database: &'a str,
    output_location: &'a str,
    policy: PollPolicy,
}

impl<'a> QueryRunner<'a> {
    /// Creates a new query runner.
    pub fn new(
        engine: &'a dyn QueryEngine,
        database: &'a str,
        output_location: &'a str,
        policy: PollPolicy,
    ) -> Self {
        Self {
            engine,
            database,
            output_location,
            policy,
        }
    }

    /// Runs `sql` to completion and returns where its results were written.
    ///
    /// Fails with `Execution` if the engine reports FAILED or CANCELLED, and
    /// with `Timeout` if the query is still running after the poll budget. A
    /// timed-out query is asked to stop before returning.
    pub async fn execute(&self, sql: &str) -> Result<ResultLocation> {
        let execution_id = self
            .engine
            .start_query(sql, self.database, self.output_location)
            .await?;

        let mut attempts = 0;
        let status = loop {
            let status = self.engine.get_execution(&execution_id).await?;
            attempts += 1;
            debug!(
                "Query {} is {} (check {}/{})",
                execution_id, status.state, attempts, self.policy.max_attempts
            );

            if status.state.is_terminal() {
                break status;
            }

            if attempts >= self.policy.max_attempts {
                if let Err(e) = self.engine.stop_query(&execution_id).await {
                    warn!("Could not stop timed-out query {}: {}", execution_id, e);
                }
                return Err(DashboardError::Timeout {
                    execution_id,
                    attempts,
                });
            }

            tokio::time::sleep(self.policy.interval).await;
        };

        match status.state {
            ExecutionState::Succeeded => {
                let output = status.output_location.ok_or_else(|| {
                    DashboardError::engine(format!(
                        "Query {execution_id} succeeded but reported no output location"
                    ))
                })?;
                ResultLocation::parse(&output)
            }
            state => Err(DashboardError::execution(execution_id, state, status.reason)),
        }
    }
}
