use anyhow::Result;
use std::process::ExitCode;
use wallet2fa_conformance::cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let action = cli::start()?;

    action.execute().await
}
