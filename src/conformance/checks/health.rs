use crate::conformance::{
    contract::{HEALTH, HEALTH_FIELDS},
    ApiClient, CheckError, ResultsLog, RunContext,
};
use reqwest::StatusCode;
use serde_json::Value;

pub const NAME: &str = "Health Endpoint";

/// `GET /health` answers 200 with `status: "ok"`, a timestamp and the product's service name.
///
/// # Errors
/// Returns an error if the request fails or a 200 body is not JSON.
pub async fn run(
    client: &ApiClient,
    ctx: &RunContext,
    log: &mut ResultsLog,
) -> Result<bool, CheckError> {
    let response = client.get(HEALTH).await?;

    if response.status != StatusCode::OK {
        return Ok(log.fail(
            NAME,
            format!("Expected status 200, got {}", response.status.as_u16()),
            Some(response.details()),
        ));
    }

    let data = response.json()?;

    let missing: Vec<&str> = HEALTH_FIELDS
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

    if data["status"] != "ok" {
        return Ok(log.fail(
            NAME,
            format!("Expected status 'ok', got {}", data["status"]),
            Some(data),
        ));
    }

    let service = data["service"].as_str().unwrap_or_default();
    if !service.contains(&ctx.product) {
        return Ok(log.fail(
            NAME,
            format!(
                "Expected service to contain '{}', got {}",
                ctx.product,
                display(&data["service"])
            ),
            Some(data),
        ));
    }

    Ok(log.pass(NAME, "Health endpoint working correctly", Some(data)))
}

fn display(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), |s| format!("'{s}'"))
}
