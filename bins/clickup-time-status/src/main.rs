//! clickup-time-status: time-in-status report for ClickUp tasks
//!
//! Reads task ids from a JSON config file, fetches their status history in
//! bulk and prints one CSV row per historic status with business-day
//! durations.

use anyhow::{Context, Result};
use clap::Parser;
use clickup_api_client::{CallContext, ClickupClient};
use clickup_telemetry::{TelemetryConfig, Timer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

mod config;
mod report;

use config::ReportConfig;

/// Time-in-status report for ClickUp tasks
#[derive(Parser, Debug)]
#[command(name = "clickup-time-status")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'f', long = "config", default_value = "config.json")]
    config: PathBuf,

    /// API token; overrides the config file
    #[arg(long, env = "CLICKUP_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) =
        clickup_telemetry::init_with_config(TelemetryConfig::for_cli(cli.verbose, cli.json_logs))
    {
        eprintln!("warning: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ReportConfig::load(&cli.config)?.with_token_override(cli.token);
    config.validate()?;

    let client =
        ClickupClient::with_config(config.client_config()).context("failed to build API client")?;
    let ctx = CallContext::background();

    info!(tasks = config.task_ids.len(), "Fetching time in status");
    let timer = Timer::start("time_in_status_report");

    let results = client
        .tasks()
        .time_in_status_for_all(
            &ctx,
            &config.task_ids,
            &config.workspace_id,
            config.use_custom_task_ids,
        )
        .await
        .context("failed to fetch time in status")?;

    let rows = report::build_report(&results).context("unreadable status timestamp")?;
    report::write_csv(std::io::stdout().lock(), &rows).context("failed to write report")?;

    let elapsed = timer.stop();
    info!(rows = rows.len(), elapsed_ms = elapsed.as_millis(), "Report written");
    Ok(())
}
