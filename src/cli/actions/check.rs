use crate::cli::telemetry;
use crate::conformance::{ApiClient, Report, ResultsLog, RunContext, RunSummary, Runner, Suite};
use anyhow::{Context, Result};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct Args {
    pub base_url: String,
    pub timeout: Duration,
    pub product: String,
    pub address: String,
    pub secondary_address: String,
    pub suite: Suite,
    pub report: Option<PathBuf>,
}

/// Run the selected suite and map the outcome to the process exit status.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or the report cannot be written.
pub async fn execute(args: Args) -> Result<ExitCode> {
    let summary = run(&args).await;

    telemetry::shutdown_tracer();

    Ok(ExitCode::from(summary?.exit_code()))
}

/// # Errors
/// Returns an error if the HTTP client cannot be built or the report cannot be written.
#[instrument(skip_all, fields(base_url = %args.base_url, suite = %args.suite))]
pub async fn run(args: &Args) -> Result<RunSummary> {
    let client = ApiClient::new(&args.base_url, args.timeout)
        .with_context(|| format!("invalid base URL {}", args.base_url))?;

    let ctx = RunContext::new(&args.product, &args.address, &args.secondary_address);
    let checks = args.suite.checks();

    info!("running {} checks", checks.len());

    let mut runner = Runner::new(client, ctx, ResultsLog::stdout());
    let summary = runner.run(&checks).await;

    if let Some(path) = &args.report {
        Report::new(
            runner.client().base_url(),
            args.suite,
            &summary,
            runner.log().results(),
        )
        .write_to(path)?;
        info!("report written to {}", path.display());
    }

    Ok(summary)
}
