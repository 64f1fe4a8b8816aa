use crate::conformance::{
    contract::{is_valid_nonce, NONCE, NONCE_UNIQUENESS_SAMPLES},
    ApiClient, CheckError, ResultsLog, RunContext,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashSet;

pub const NAME: &str = "Nonce Endpoint";
pub const VALIDATION_NAME: &str = "Nonce Endpoint Validation";
pub const UNIQUENESS_NAME: &str = "Nonce Uniqueness";

/// Result of asking the service for a nonce.
#[derive(Debug, Clone, PartialEq)]
pub enum Issued {
    Nonce(String),
    Rejected { message: String, details: Value },
}

/// Request a nonce for `address` and validate its format.
///
/// # Errors
/// Returns an error if the request fails or a 200 body is not JSON.
pub async fn issue(client: &ApiClient, address: &str) -> Result<Issued, CheckError> {
    let response = client.post_json(NONCE, &json!({ "address": address })).await?;

    if response.status != StatusCode::OK {
        return Ok(Issued::Rejected {
            message: format!("Expected status 200, got {}", response.status.as_u16()),
            details: response.details(),
        });
    }

    let data = response.json()?;

    let Some(nonce) = data.get("nonce") else {
        return Ok(Issued::Rejected {
            message: "Response missing 'nonce' field".to_string(),
            details: data,
        });
    };

    match nonce.as_str() {
        Some(nonce) if is_valid_nonce(nonce) => Ok(Issued::Nonce(nonce.to_string())),
        _ => Ok(Issued::Rejected {
            message: format!("Expected 32-char lowercase hex nonce, got: {nonce}"),
            details: data,
        }),
    }
}

/// Issue a nonce for the primary address, keep it for later checks, then
/// confirm that a payload without an address is refused with 400.
///
/// # Errors
/// Returns an error if a request fails or a 200 body is not JSON.
pub async fn run(
    client: &ApiClient,
    ctx: &mut RunContext,
    log: &mut ResultsLog,
) -> Result<bool, CheckError> {
    match issue(client, &ctx.address).await? {
        Issued::Rejected { message, details } => return Ok(log.fail(NAME, message, Some(details))),
        Issued::Nonce(nonce) => {
            log.pass(
                NAME,
                format!("Nonce generated successfully: {}...", &nonce[..8]),
                None,
            );
            ctx.set_nonce(nonce);
        }
    }

    let response = client.post_json(NONCE, &json!({})).await?;
    if response.status != StatusCode::BAD_REQUEST {
        return Ok(log.fail(
            VALIDATION_NAME,
            format!(
                "Expected 400 for missing address, got {}",
                response.status.as_u16()
            ),
            Some(response.details()),
        ));
    }

    Ok(log.pass(VALIDATION_NAME, "Correctly rejects missing address", None))
}

/// Consecutive nonces for the same address must never repeat.
///
/// # Errors
/// Returns an error if a request fails or a 200 body is not JSON.
pub async fn run_uniqueness(
    client: &ApiClient,
    ctx: &RunContext,
    log: &mut ResultsLog,
) -> Result<bool, CheckError> {
    let mut nonces = Vec::with_capacity(NONCE_UNIQUENESS_SAMPLES);

    for attempt in 1..=NONCE_UNIQUENESS_SAMPLES {
        match issue(client, &ctx.address).await? {
            Issued::Nonce(nonce) => nonces.push(nonce),
            Issued::Rejected { message, details } => {
                return Ok(log.fail(
                    UNIQUENESS_NAME,
                    format!("Failed to generate nonce {attempt}: {message}"),
                    Some(details),
                ));
            }
        }
    }

    let distinct: HashSet<&str> = nonces.iter().map(String::as_str).collect();
    if distinct.len() != nonces.len() {
        return Ok(log.fail(UNIQUENESS_NAME, "Nonces should be unique", Some(json!(nonces))));
    }

    Ok(log.pass(
        UNIQUENESS_NAME,
        "Nonce generation and uniqueness working correctly",
        None,
    ))
}
