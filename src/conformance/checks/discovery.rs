use crate::conformance::{
    contract::{DISCOVERY_FIELDS, DOCUMENTED_ENDPOINTS, ROOT},
    ApiClient, CheckError, ResultsLog,
};
use reqwest::StatusCode;
use serde_json::Value;

pub const NAME: &str = "Root Endpoint";

/// `GET /` lists `message`, `version` and every documented route signature.
///
/// # Errors
/// Returns an error if the request fails or a 200 body is not JSON.
pub async fn run(client: &ApiClient, log: &mut ResultsLog) -> Result<bool, CheckError> {
    let response = client.get(ROOT).await?;

    if response.status != StatusCode::OK {
        return Ok(log.fail(
            NAME,
            format!("Expected status 200, got {}", response.status.as_u16()),
            Some(response.details()),
        ));
    }

    let data = response.json()?;

    let missing: Vec<&str> = DISCOVERY_FIELDS
        .into_iter()
        .filter(|field| data.get(field).is_none())
        .collect();
    if !missing.is_empty() {
        return Ok(log.fail(
            NAME,
            format!("Missing required fields: {missing:?}"),
            Some(data),
        ));
    }

    for endpoint in DOCUMENTED_ENDPOINTS {
        if !advertises(&data["endpoints"], endpoint) {
            return Ok(log.fail(NAME, format!("Missing endpoint: {endpoint}"), Some(data)));
        }
    }

    Ok(log.pass(NAME, "Root endpoint working correctly", Some(data)))
}

/// `endpoints` may be a list of signatures or an object keyed by them.
fn advertises(endpoints: &Value, signature: &str) -> bool {
    match endpoints {
        Value::Array(items) => items.iter().any(|item| item.as_str() == Some(signature)),
        Value::Object(map) => map.contains_key(signature),
        _ => false,
    }
}
