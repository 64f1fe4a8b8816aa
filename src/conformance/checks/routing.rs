use crate::conformance::{contract::INVALID_ROUTES, ApiClient, CheckError, ResultsLog};
use reqwest::StatusCode;

pub const NAME: &str = "Negative Routing";

/// Unknown routes answer 404 instead of falling through to a handler.
///
/// # Errors
/// Returns an error if a request fails.
pub async fn run(client: &ApiClient, log: &mut ResultsLog) -> Result<bool, CheckError> {
    for route in INVALID_ROUTES {
        let response = client.get(route).await?;

        if response.status != StatusCode::NOT_FOUND {
            return Ok(log.fail(
                NAME,
                format!(
                    "Route {route} should return 404, got {}",
                    response.status.as_u16()
                ),
                Some(response.details()),
            ));
        }
    }

    Ok(log.pass(NAME, "Unknown routes return 404", None))
}
