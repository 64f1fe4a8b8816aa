//! Maps validated CLI arguments to the action the binary executes.

use crate::cli::actions::{check::Args, Action};
use crate::cli::commands::{
    ARG_ADDRESS, ARG_BASE_URL, ARG_PRODUCT, ARG_REPORT, ARG_SECONDARY_ADDRESS, ARG_SUITE,
    ARG_TIMEOUT,
};
use crate::conformance::Suite;
use anyhow::{anyhow, bail, Context, Result};
use std::{path::PathBuf, time::Duration};

fn required(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

/// # Errors
/// Returns an error if an argument is missing or the two addresses coincide.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let base_url = required(matches, ARG_BASE_URL)?;
    let timeout = Duration::from_secs(matches.get_one::<u64>(ARG_TIMEOUT).copied().unwrap_or(10));
    let product = required(matches, ARG_PRODUCT)?;
    let address = required(matches, ARG_ADDRESS)?;
    let secondary_address = required(matches, ARG_SECONDARY_ADDRESS)?;

    if address.eq_ignore_ascii_case(&secondary_address) {
        bail!("--{ARG_SECONDARY_ADDRESS} must differ from --{ARG_ADDRESS}");
    }

    let suite = required(matches, ARG_SUITE)?
        .parse::<Suite>()
        .map_err(|e| anyhow!(e))?;

    Ok(Action::Check(Args {
        base_url,
        timeout,
        product,
        address,
        secondary_address,
        suite,
        report: matches.get_one::<PathBuf>(ARG_REPORT).cloned(),
    }))
}
