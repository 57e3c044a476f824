//! Analytics engine abstraction for the dashboard.
//!
//! Provides a trait-based interface for submitting queries and observing
//! their execution, so the Athena client and the in-memory test engine can be
//! used interchangeably.

mod athena;
mod mock;

pub use athena::AthenaEngine;
pub use mock::{ScriptedEngine, Submission};

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Opaque identifier the engine assigns to a submitted query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionId(String);

impl ExecutionId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ExecutionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ExecutionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle state of a query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    /// Accepted but not yet started.
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionState {
    /// Returns true once no further status changes can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    /// Returns the engine's name for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single status check reported about an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStatus {
    pub state: ExecutionState,

    /// Where the result artifact was written. Set once the query succeeds.
    pub output_location: Option<String>,

    /// Engine-supplied explanation of the last state change.
    pub reason: Option<String>,
}

impl ExecutionStatus {
    /// A status with no output location or reason.
    pub fn new(state: ExecutionState) -> Self {
        Self {
            state,
            output_location: None,
            reason: None,
        }
    }

    /// A succeeded status pointing at the given output location.
    pub fn succeeded(output_location: impl Into<String>) -> Self {
        Self {
            state: ExecutionState::Succeeded,
            output_location: Some(output_location.into()),
            reason: None,
        }
    }

    /// A failed status with an optional reason.
    pub fn failed(reason: Option<&str>) -> Self {
        Self {
            state: ExecutionState::Failed,
            output_location: None,
            reason: reason.map(String::from),
        }
    }
}

/// Trait defining the interface for analytics engines.
///
/// All operations are async and return Results with DashboardError.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Submits a query against `database`, writing results under `output_location`.
    async fn start_query(
        &self,
        sql: &str,
        database: &str,
        output_location: &str,
    ) -> Result<ExecutionId>;

    /// Reports the current status of an execution.
    async fn get_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus>;

    /// Asks the engine to stop an execution that is still in flight.
    async fn stop_query(&self, id: &ExecutionId) -> Result<()>;
}
