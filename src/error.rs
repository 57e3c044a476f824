//! Error types for the dashboard.
//!
//! Defines the main error enum used throughout the application.

use crate::engine::{ExecutionId, ExecutionState};
use thiserror::Error;

/// Reason shown when the engine reports a failure without explaining it.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Main error type for dashboard operations.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The engine finished the query in FAILED or CANCELLED state.
    #[error("Query {execution_id} failed ({state}): {reason}")]
    Execution {
        execution_id: ExecutionId,
        state: ExecutionState,
        reason: String,
    },

    /// The query was still running when the poll budget ran out.
    #[error("Query {execution_id} did not finish after {attempts} status checks")]
    Timeout {
        execution_id: ExecutionId,
        attempts: u32,
    },

    /// Analytics engine API errors (submission, status polling, etc.)
    #[error("Engine error: {0}")]
    Engine(String),

    /// Object storage errors (missing object, access denied, etc.)
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Malformed result data (ragged rows, invalid UTF-8, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors (invalid config file, unsafe report SQL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server and output errors.
    #[error("Server error: {0}")]
    Server(String),
}

impl DashboardError {
    /// Creates an execution error, falling back to [`UNKNOWN_ERROR`] when the
    /// engine gave no reason.
    pub fn execution(
        execution_id: ExecutionId,
        state: ExecutionState,
        reason: Option<String>,
    ) -> Self {
        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        Self::Execution {
            execution_id,
            state,
            reason,
        }
    }

    /// Creates an engine error with the given message.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Creates a retrieval error with the given message.
    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }

    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a server error with the given message.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Execution { .. } => "Execution Error",
            Self::Timeout { .. } => "Timeout Error",
            Self::Engine(_) => "Engine Error",
            Self::Retrieval(_) => "Retrieval Error",
            Self::Parse(_) => "Parse Error",
            Self::Config(_) => "Configuration Error",
            Self::Server(_) => "Server Error",
        }
    }
}

/// Result type alias using DashboardError.
pub type Result<T> = std::result::Result<T, DashboardError>;
