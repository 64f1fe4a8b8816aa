use crate::conformance::{
    contract::{BURST_REQUESTS, BURST_TIMEOUT_SECS, HEALTH},
    ApiClient, CheckError, ResultsLog,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::debug;

pub const NAME: &str = "Burst Liveness";

/// Back-to-back health requests, sent one at a time, all answer 200.
///
/// A timed out or refused request counts as a miss instead of aborting the burst.
///
/// # Errors
/// Never fails at the transport level; the signature matches the other checks.
pub async fn run(client: &ApiClient, log: &mut ResultsLog) -> Result<bool, CheckError> {
    let timeout = Duration::from_secs(BURST_TIMEOUT_SECS);
    let started = Instant::now();
    let mut outcomes: Vec<Value> = Vec::with_capacity(BURST_REQUESTS);

    for _ in 0..BURST_REQUESTS {
        match client.get_with_timeout(HEALTH, timeout).await {
            Ok(response) => outcomes.push(json!(response.status.as_u16())),
            Err(e) => {
                debug!("burst request failed: {e}");
                outcomes.push(json!(e.to_string()));
            }
        }
    }

    let succeeded = outcomes
        .iter()
        .filter(|o| o.as_u64() == Some(u64::from(StatusCode::OK.as_u16())))
        .count();
    let elapsed_ms = started.elapsed().as_millis();

    if succeeded == BURST_REQUESTS {
        Ok(log.pass(
            NAME,
            format!("All {BURST_REQUESTS} sequential requests succeeded in {elapsed_ms} ms"),
            None,
        ))
    } else {
        Ok(log.fail(
            NAME,
            format!("Only {succeeded}/{BURST_REQUESTS} rapid requests succeeded"),
            Some(json!({ "outcomes": outcomes })),
        ))
    }
}
