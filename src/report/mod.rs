//! The report cycle: run every configured report and render the page.
//!
//! Reports run strictly one after another. A report that fails is recorded
//! with its error and the cycle moves on to the next one.

pub mod html;

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::QueryEngine;
use crate::error::{DashboardError, Result};
use crate::query::{PollPolicy, QueryRunner, ResultFetcher, ResultSet};
use crate::storage::ObjectStore;

/// A named SQL report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// Heading shown above the report's table.
    pub title: String,
    /// SQL submitted to the engine.
    pub sql: String,
}

impl ReportDefinition {
    /// Creates a report definition.
    pub fn new(title: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sql: sql.into(),
        }
    }
}

/// The outcome of one report in a cycle.
#[derive(Debug)]
pub struct ReportSection {
    pub title: String,
    pub outcome: Result<ResultSet>,
}

impl ReportSection {
    /// Returns true if the report produced a result set.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs a list of reports against one engine and object store.
pub struct ReportCycle<'a> {
    runner: QueryRunner<'a>,
    fetcher: ResultFetcher<'a>,
    reports: &'a [ReportDefinition],
}

impl<'a> ReportCycle<'a> {
    /// Creates a new report cycle.
    pub fn new(
        runner: QueryRunner<'a>,
        fetcher: ResultFetcher<'a>,
        reports: &'a [ReportDefinition],
    ) -> Self {
        Self {
            runner,
            fetcher,
            reports,
        }
    }

    /// Runs every report in order and returns one section per report.
    pub async fn run(&self) -> Vec<ReportSection> {
        let mut sections = Vec::with_capacity(self.reports.len());
        for report in self.reports {
            info!("Running report '{}'", report.title);
            let outcome = self.run_report(report).await;

            match &outcome {
                Ok(result) => info!("Report '{}' returned {}", report.title, result.summary()),
                Err(e) => warn!("Report '{}' failed: {}: {}", report.title, e.category(), e),
            }

            sections.push(ReportSection {
                title: report.title.clone(),
                outcome,
            });
        }
        sections
    }

    async fn run_report(&self, report: &ReportDefinition) -> Result<ResultSet> {
        let start = Instant::now();
        let location = self.runner.execute(&report.sql).await?;
        let result = self.fetcher.fetch(&location).await?;
        Ok(result.with_execution_time(start.elapsed()))
    }
}

/// Everything needed to produce the dashboard page, shared across requests.
pub struct Dashboard {
    engine: Arc<dyn QueryEngine>,
    store: Arc<dyn ObjectStore>,
    title: String,
    database: String,
    output_location: String,
    policy: PollPolicy,
    reports: Vec<ReportDefinition>,
}

impl Dashboard {
    /// Creates a dashboard from validated configuration and service handles.
    pub fn new(
        config: &Config,
        engine: Arc<dyn QueryEngine>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            engine,
            store,
            title: config.title.clone(),
            database: config.athena.database.clone(),
            output_location: config.athena.output_location.clone(),
            policy: config.athena.poll_policy(),
            reports: config.resolved_reports(),
        }
    }

    /// Page title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Reports in display order, with SQL ready to submit.
    pub fn reports(&self) -> &[ReportDefinition] {
        &self.reports
    }

    /// Runs one full report cycle.
    pub async fn run_cycle(&self) -> Vec<ReportSection> {
        let runner = QueryRunner::new(
            self.engine.as_ref(),
            &self.database,
            &self.output_location,
            self.policy,
        );
        let fetcher = ResultFetcher::new(self.store.as_ref());
        ReportCycle::new(runner, fetcher, &self.reports).run().await
    }

    /// Runs one report cycle and renders the HTML page.
    pub async fn render(&self) -> String {
        let start = Instant::now();
        let sections = self.run_cycle().await;
        let failed = sections.iter().filter(|s| !s.is_success()).count();
        info!(
            "Rendered {} reports ({} failed) in {:.1}s",
            sections.len(),
            failed,
            start.elapsed().as_secs_f64()
        );
        html::render_page(&self.title, &sections)
    }
}

/// Collects the errors of failed sections, for callers that need them.
pub fn failures(sections: &[ReportSection]) -> Vec<(&str, &DashboardError)> {
    sections
        .iter()
        .filter_map(|s| s.outcome.as_ref().err().map(|e| (s.title.as_str(), e)))
        .collect()
}
