//! Scripted engine for testing.
//!
//! Plays back a predefined sequence of statuses for each submitted query.

use super::{ExecutionId, ExecutionState, ExecutionStatus, QueryEngine};
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// An in-memory engine that answers status polls from a script.
///
/// Scripts are matched by substring against the submitted SQL, first match
/// wins. Each poll consumes one status; the final status repeats forever.
/// Execution ids are assigned as `q-1`, `q-2`, ... in submission order.
#[derive(Default)]
pub struct ScriptedEngine {
    scripts: Vec<(String, Vec<ExecutionStatus>)>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u32,
    running: HashMap<ExecutionId, VecDeque<ExecutionStatus>>,
    submissions: Vec<Submission>,
    polls: HashMap<ExecutionId, u32>,
    stopped: Vec<ExecutionId>,
}

/// A query the engine was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: ExecutionId,
    pub sql: String,
    pub database: String,
    pub output_location: String,
}

impl ScriptedEngine {
    /// Creates an engine with no scripts. Every submission is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a status script for queries whose SQL contains `sql_fragment`.
    pub fn with_script(
        mut self,
        sql_fragment: impl Into<String>,
        statuses: Vec<ExecutionStatus>,
    ) -> Self {
        self.scripts.push((sql_fragment.into(), statuses));
        self
    }

    /// Queries submitted so far, in order.
    pub fn submissions(&self) -> Vec<Submission> {
        self.lock().submissions.clone()
    }

    /// Number of status polls made for an execution.
    pub fn poll_count(&self, id: &ExecutionId) -> u32 {
        self.lock().polls.get(id).copied().unwrap_or(0)
    }

    /// Executions the caller asked to stop.
    pub fn stopped(&self) -> Vec<ExecutionId> {
        self.lock().stopped.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked mid-update.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    async fn start_query(
        &self,
        sql: &str,
        database: &str,
        output_location: &str,
    ) -> Result<ExecutionId> {
        let statuses = self
            .scripts
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, statuses)| statuses.clone())
            .ok_or_else(|| DashboardError::engine("InvalidRequestException: no script for query"))?;

        let mut inner = self.lock();
        inner.next_id += 1;
        let id = ExecutionId::from(format!("q-{}", inner.next_id));
        inner.running.insert(id.clone(), statuses.into());
        inner.submissions.push(Submission {
            id: id.clone(),
            sql: sql.to_string(),
            database: database.to_string(),
            output_location: output_location.to_string(),
        });
        Ok(id)
    }

    async fn get_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus> {
        let mut inner = self.lock();
        *inner.polls.entry(id.clone()).or_insert(0) += 1;

        let queue = inner
            .running
            .get_mut(id)
            .ok_or_else(|| DashboardError::engine(format!("Unknown execution {id}")))?;

        let status = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(status.unwrap_or_else(|| ExecutionStatus::new(ExecutionState::Running)))
    }

    async fn stop_query(&self, id: &ExecutionId) -> Result<()> {
        let mut inner = self.lock();
        if let Some(queue) = inner.running.get_mut(id) {
            queue.clear();
            queue.push_back(ExecutionStatus::new(ExecutionState::Cancelled));
        }
        inner.stopped.push(id.clone());
        Ok(())
    }
}
