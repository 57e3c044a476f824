//! Command-line argument parsing for the dashboard.

use athena_dashboard::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Serve an HTML dashboard of Athena reports.
#[derive(Parser, Debug)]
#[command(name = "athena-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// AWS region for the Athena and S3 clients
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Athena database the reports run against
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// Table substituted into report SQL
    #[arg(short = 't', long, value_name = "TABLE")]
    pub table: Option<String>,

    /// S3 prefix where Athena writes query results (s3://bucket/prefix/)
    #[arg(long, value_name = "S3_URL")]
    pub output_location: Option<String>,

    /// Address to serve the dashboard on
    #[arg(short = 'b', long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Delay between query status checks, in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Status checks allowed per query before giving up
    #[arg(long, value_name = "N")]
    pub max_poll_attempts: Option<u32>,

    /// Render the page once and exit instead of serving it
    #[arg(long)]
    pub once: bool,

    /// With --once, write the page to this file instead of stdout
    #[arg(long, value_name = "PATH", requires = "once")]
    pub output_file: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line values on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(region) = &self.region {
            config.aws.region = region.clone();
        }
        if let Some(database) = &self.database {
            config.athena.database = database.clone();
        }
        if let Some(table) = &self.table {
            config.athena.table = table.clone();
        }
        if let Some(output_location) = &self.output_location {
            config.athena.output_location = output_location.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(interval) = self.poll_interval_ms {
            config.athena.poll_interval_ms = interval;
        }
        if let Some(attempts) = self.max_poll_attempts {
            config.athena.max_poll_attempts = attempts;
        }
    }
}
