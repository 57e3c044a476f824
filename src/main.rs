//! athena-dashboard - An HTML dashboard for a fixed set of Athena reports.

mod cli;

use std::io::Write;
use std::sync::Arc;

use athena_dashboard::config::Config;
use athena_dashboard::engine::AthenaEngine;
use athena_dashboard::error::{DashboardError, Result};
use athena_dashboard::logging;
use athena_dashboard::report::{self, html, Dashboard};
use athena_dashboard::server;
use athena_dashboard::storage::S3Store;
use aws_config::{BehaviorVersion, Region};
use cli::Cli;
use tracing::{error, info, warn};

/// Exit status for `--once` when at least one report failed.
const EXIT_REPORT_FAILED: i32 = 2;

#[tokio::main]
async fn main() {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();
    logging::init_stderr_logging();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_REPORT_FAILED),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

/// Runs the dashboard. Returns false if a `--once` render had failed reports.
async fn run() -> Result<bool> {
    let cli = Cli::parse_args();

    // Precedence: CLI flags, then environment, then config file, then defaults.
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_env_overrides();
    cli.apply_overrides(&mut config);
    config.validate()?;

    let policy = config.athena.poll_policy();
    info!(
        "Athena database '{}' in {}, results under {}, {} reports, up to {:?} per query",
        config.athena.database,
        config.aws.region,
        config.athena.output_location,
        config.reports.len(),
        policy.max_wait()
    );

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws.region.clone()))
        .load()
        .await;
    let engine = Arc::new(AthenaEngine::from_conf(&sdk_config));
    let store = Arc::new(S3Store::from_conf(&sdk_config));
    let dashboard = Arc::new(Dashboard::new(&config, engine, store));

    if cli.once {
        let sections = dashboard.run_cycle().await;
        let page = html::render_page(dashboard.title(), &sections);

        match &cli.output_file {
            Some(path) => {
                tokio::fs::write(path, page.as_bytes()).await.map_err(|e| {
                    DashboardError::server(format!("Failed to write {}: {e}", path.display()))
                })?;
                info!("Wrote dashboard to {}", path.display());
            }
            None => std::io::stdout()
                .write_all(page.as_bytes())
                .map_err(|e| DashboardError::server(format!("Failed to write page: {e}")))?,
        }

        let failed = report::failures(&sections);
        if !failed.is_empty() {
            warn!("{} of {} reports failed", failed.len(), sections.len());
            return Ok(false);
        }
        return Ok(true);
    }

    server::run(config.server.bind_addr()?, dashboard).await?;
    Ok(true)
}
