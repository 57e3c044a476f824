//! Configuration management for the dashboard.
//!
//! Handles loading configuration from TOML files and environment variables,
//! with built-in defaults for every setting including the report list.

use crate::error::{DashboardError, Result};
use crate::query::PollPolicy;
use crate::report::ReportDefinition;
use crate::safety;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder in report SQL replaced by the configured database name.
pub const DATABASE_PLACEHOLDER: &str = "{database}";

/// Placeholder in report SQL replaced by the configured table name.
pub const TABLE_PLACEHOLDER: &str = "{table}";

/// Main configuration structure for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page title and top-level heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// AWS client settings.
    #[serde(default)]
    pub aws: AwsConfig,

    /// Athena query settings.
    #[serde(default)]
    pub athena: AthenaConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Reports rendered on the page, in order.
    #[serde(default = "default_reports")]
    pub reports: Vec<ReportDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            aws: AwsConfig::default(),
            athena: AthenaConfig::default(),
            server: ServerConfig::default(),
            reports: default_reports(),
        }
    }
}

fn default_title() -> String {
    "Athena Orders Dashboard".to_string()
}

/// AWS client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region for the Athena and S3 clients.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
        }
    }
}

/// Athena query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthenaConfig {
    /// Database the reports run against.
    #[serde(default = "default_database")]
    pub database: String,

    /// Table substituted for `{table}` in report SQL.
    #[serde(default = "default_table")]
    pub table: String,

    /// S3 prefix where Athena writes query results.
    #[serde(default = "default_output_location")]
    pub output_location: String,

    /// Delay between status checks, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Status checks allowed per query before it is reported as timed out.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

fn default_database() -> String {
    "orders_db".to_string()
}

fn default_table() -> String {
    "processed".to_string()
}

fn default_output_location() -> String {
    "s3://3awsassignment/enriched/".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    300
}

impl Default for AthenaConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            table: default_table(),
            output_location: default_output_location(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl AthenaConfig {
    /// Returns the poll policy described by this config.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            self.max_poll_attempts,
        )
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    /// Parses the bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| {
            DashboardError::config(format!("Invalid bind address '{}': {e}", self.bind))
        })
    }
}

/// The reports shown when the config file does not list any.
pub fn default_reports() -> Vec<ReportDefinition> {
    vec![
        ReportDefinition::new(
            "1. Total Sales by Customer",
            r#"SELECT customer, SUM(amount) AS total_sales
FROM "{database}"."{table}"
GROUP BY customer
ORDER BY total_sales DESC"#,
        ),
        ReportDefinition::new(
            "2. Monthly Order Volume and Revenue",
            r#"SELECT date_trunc('month', CAST(orderdate AS DATE)) AS order_month,
       COUNT(orderid) AS number_of_orders,
       ROUND(SUM(amount), 2) AS monthly_revenue
FROM "{database}"."{table}"
GROUP BY date_trunc('month', CAST(orderdate AS DATE))
ORDER BY order_month"#,
        ),
        ReportDefinition::new(
            "3. Order Status Dashboard",
            r#"SELECT status,
       COUNT(orderid) AS order_count,
       ROUND(SUM(amount), 2) AS total_amount
FROM "{database}"."{table}"
WHERE status IN ('shipped', 'confirmed')
GROUP BY status
ORDER BY order_count DESC"#,
        ),
        ReportDefinition::new(
            "4. Average Order Value (AOV) per Customer",
            r#"SELECT customer,
       ROUND(AVG(amount), 2) AS avg_order_value
FROM "{database}"."{table}"
GROUP BY customer
ORDER BY avg_order_value DESC"#,
        ),
        ReportDefinition::new(
            "5. Top 10 Largest Orders in February 2025",
            r#"SELECT orderid,
       customer,
       orderdate,
       amount
FROM "{database}"."{table}"
WHERE CAST(orderdate AS DATE) BETWEEN DATE '2025-02-01' AND DATE '2025-02-28'
ORDER BY amount DESC
LIMIT 10"#,
        ),
    ]
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("athena-dashboard")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            DashboardError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment variables (AWS_REGION, DASHBOARD_DATABASE, etc.)
    /// on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(region) = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")) {
            self.aws.region = region;
        }
        if let Some(database) = lookup("DASHBOARD_DATABASE") {
            self.athena.database = database;
        }
        if let Some(table) = lookup("DASHBOARD_TABLE") {
            self.athena.table = table;
        }
        if let Some(output_location) = lookup("DASHBOARD_OUTPUT_LOCATION") {
            self.athena.output_location = output_location;
        }
        if let Some(bind) = lookup("DASHBOARD_BIND") {
            self.server.bind = bind;
        }
    }

    /// Substitutes the database and table placeholders in report SQL.
    pub fn render_sql(&self, sql: &str) -> String {
        sql.replace(DATABASE_PLACEHOLDER, &self.athena.database)
            .replace(TABLE_PLACEHOLDER, &self.athena.table)
    }

    /// Returns the reports with their SQL ready to submit.
    pub fn resolved_reports(&self) -> Vec<ReportDefinition> {
        self.reports
            .iter()
            .map(|report| ReportDefinition::new(report.title.clone(), self.render_sql(&report.sql)))
            .collect()
    }

    /// Checks that the configuration can be used to serve the dashboard.
    pub fn validate(&self) -> Result<()> {
        // The output location is a prefix, so only the bucket is required.
        let prefix_ok = self
            .athena
            .output_location
            .strip_prefix(crate::storage::S3_SCHEME)
            .map(|rest| !rest.is_empty() && !rest.starts_with('/'))
            .unwrap_or(false);
        if !prefix_ok {
            return Err(DashboardError::config(format!(
                "athena.output_location must be an s3://bucket/prefix URL, got '{}'",
                self.athena.output_location
            )));
        }

        if self.athena.database.trim().is_empty() {
            return Err(DashboardError::config("athena.database must not be empty"));
        }
        if self.athena.poll_interval_ms == 0 {
            return Err(DashboardError::config(
                "athena.poll_interval_ms must be greater than zero",
            ));
        }
        if self.athena.max_poll_attempts == 0 {
            return Err(DashboardError::config(
                "athena.max_poll_attempts must be greater than zero",
            ));
        }

        self.server.bind_addr()?;

        if self.reports.is_empty() {
            return Err(DashboardError::config("at least one report is required"));
        }
        for report in self.resolved_reports() {
            if report.title.trim().is_empty() {
                return Err(DashboardError::config("report titles must not be empty"));
            }
            safety::ensure_read_only(&report.sql).map_err(|reason| {
                DashboardError::config(format!("report '{}': {reason}", report.title))
            })?;
        }

        Ok(())
    }
}
