//! Amazon Athena engine implementation.
//!
//! Provides the `AthenaEngine` struct that implements the `QueryEngine` trait
//! using the AWS SDK.

use super::{ExecutionId, ExecutionState, ExecutionStatus, QueryEngine};
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use aws_sdk_athena::Client;
use tracing::debug;

/// Athena query engine.
#[derive(Debug, Clone)]
pub struct AthenaEngine {
    client: Client,
}

impl AthenaEngine {
    /// Creates an engine from an existing Athena client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates an engine from shared AWS configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

#[async_trait]
impl QueryEngine for AthenaEngine {
    async fn start_query(
        &self,
        sql: &str,
        database: &str,
        output_location: &str,
    ) -> Result<ExecutionId> {
        let response = self
            .client
            .start_query_execution()
            .query_string(sql)
            .query_execution_context(QueryExecutionContext::builder().database(database).build())
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(output_location)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                DashboardError::engine(format!(
                    "Failed to start query: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let id = response
            .query_execution_id()
            .ok_or_else(|| DashboardError::engine("Athena returned no query execution id"))?;

        debug!("Started query execution {}", id);
        Ok(ExecutionId::from(id))
    }

    async fn get_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus> {
        let response = self
            .client
            .get_query_execution()
            .query_execution_id(id.as_str())
            .send()
            .await
            .map_err(|e| {
                DashboardError::engine(format!(
                    "Failed to get status of query {id}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let execution = response.query_execution().ok_or_else(|| {
            DashboardError::engine(format!("Athena returned no execution for query {id}"))
        })?;
        let status = execution.status();

        let state = status
            .and_then(|s| s.state())
            .map(convert_state)
            .transpose()?
            .ok_or_else(|| {
                DashboardError::engine(format!("Athena returned no state for query {id}"))
            })?;

        Ok(ExecutionStatus {
            state,
            output_location: execution
                .result_configuration()
                .and_then(|rc| rc.output_location())
                .map(String::from),
            reason: status
                .and_then(|s| s.state_change_reason())
                .map(String::from),
        })
    }

    async fn stop_query(&self, id: &ExecutionId) -> Result<()> {
        self.client
            .stop_query_execution()
            .query_execution_id(id.as_str())
            .send()
            .await
            .map_err(|e| {
                DashboardError::engine(format!(
                    "Failed to stop query {id}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}

/// Maps an SDK state onto the engine-neutral state.
fn convert_state(state: &QueryExecutionState) -> Result<ExecutionState> {
    match state {
        QueryExecutionState::Queued => Ok(ExecutionState::Queued),
        QueryExecutionState::Running => Ok(ExecutionState::Running),
        QueryExecutionState::Succeeded => Ok(ExecutionState::Succeeded),
        QueryExecutionState::Failed => Ok(ExecutionState::Failed),
        QueryExecutionState::Cancelled => Ok(ExecutionState::Cancelled),
        other => Err(DashboardError::engine(format!(
            "Unrecognized query state: {}",
            other.as_str()
        ))),
    }
}
