use crate::conformance::{contract::NONCE, ApiClient, CheckError, ResultsLog, RunContext};
use reqwest::StatusCode;
use serde_json::json;

pub const NAME: &str = "Persistence Liveness";

/// Nonce issuance for a second address goes through the service's backing
/// store, so a 200 here is the only (indirect) sign that the store answers.
/// Nothing about the store itself is verified.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn run(
    client: &ApiClient,
    ctx: &RunContext,
    log: &mut ResultsLog,
) -> Result<bool, CheckError> {
    let response = client
        .post_json(NONCE, &json!({ "address": ctx.secondary_address }))
        .await?;

    if response.status == StatusCode::OK {
        Ok(log.pass(
            NAME,
            "Nonce issuance for a second address succeeded (indirect store signal)",
            None,
        ))
    } else {
        Ok(log.fail(
            NAME,
            format!(
                "Backing store may be unavailable, nonce endpoint returned {}",
                response.status.as_u16()
            ),
            Some(response.details()),
        ))
    }
}
