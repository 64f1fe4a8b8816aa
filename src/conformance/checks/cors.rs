use crate::conformance::{
    contract::{CORS_HEADERS, HEALTH, PREFLIGHT_ROUTES},
    ApiClient, CheckError, ResultsLog,
};
use reqwest::StatusCode;

pub const HEADERS_NAME: &str = "CORS Headers";
pub const PREFLIGHT_NAME: &str = "CORS Preflight";

/// `GET /health` carries the allow-origin, allow-methods and allow-headers
/// headers. Only their presence is checked.
///
/// # Errors
/// Returns an error if the request fails.
pub async fn run_headers(client: &ApiClient, log: &mut ResultsLog) -> Result<bool, CheckError> {
    let response = client.get(HEALTH).await?;

    let missing: Vec<&str> = CORS_HEADERS
        .into_iter()
        .filter(|name| !response.has_header(name))
        .collect();

    if missing.is_empty() {
        Ok(log.pass(HEADERS_NAME, "All required CORS headers present", None))
    } else {
        Ok(log.fail(
            HEADERS_NAME,
            format!("Missing CORS headers: {missing:?}"),
            None,
        ))
    }
}

/// `OPTIONS` on every documented route answers 200.
///
/// # Errors
/// Returns an error if a request fails.
pub async fn run_preflight(client: &ApiClient, log: &mut ResultsLog) -> Result<bool, CheckError> {
    for route in PREFLIGHT_ROUTES {
        let response = client.options(route).await?;

        if response.status != StatusCode::OK {
            return Ok(log.fail(
                PREFLIGHT_NAME,
                format!(
                    "OPTIONS request to {route} failed: {}",
                    response.status.as_u16()
                ),
                Some(response.details()),
            ));
        }
    }

    Ok(log.pass(
        PREFLIGHT_NAME,
        "CORS preflight working for all endpoints",
        None,
    ))
}
