use crate::conformance::{
    contract::{INVALID_BEARER_TOKEN, PROFILE},
    ApiClient, CheckError, ResultsLog,
};
use reqwest::StatusCode;

pub const NAME: &str = "Profile Endpoint Unauthorized";
pub const INVALID_TOKEN_NAME: &str = "Profile Endpoint Invalid Token";

/// The profile route refuses both anonymous and bogus-token access with 401.
///
/// # Errors
/// Returns an error if a request fails or the anonymous 401 body is not JSON.
pub async fn run(client: &ApiClient, log: &mut ResultsLog) -> Result<bool, CheckError> {
    let response = client.get(PROFILE).await?;

    if response.status != StatusCode::UNAUTHORIZED {
        return Ok(log.fail(
            NAME,
            format!("Expected status 401, got {}", response.status.as_u16()),
            Some(response.details()),
        ));
    }

    let data = response.json()?;
    let unauthorized = data
        .get("error")
        .and_then(|e| e.as_str())
        .is_some_and(|e| e.contains("Unauthorized"));

    if !unauthorized {
        return Ok(log.fail(NAME, "Should return 'Unauthorized' error", Some(data)));
    }
    log.pass(NAME, "Correctly rejects unauthorized access", Some(data));

    let response = client
        .get_with_bearer(PROFILE, INVALID_BEARER_TOKEN)
        .await?;

    if response.status != StatusCode::UNAUTHORIZED {
        return Ok(log.fail(
            INVALID_TOKEN_NAME,
            format!(
                "Expected status 401 for invalid token, got {}",
                response.status.as_u16()
            ),
            Some(response.details()),
        ));
    }

    Ok(log.pass(INVALID_TOKEN_NAME, "Correctly rejects invalid token", None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance::checks::testkit::{can_bind_localhost, client_for};
    use anyhow::Result;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_bearer_status(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/profile"))
            .and(header("Authorization", "Bearer invalid_token"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"error": "Invalid token"})),
            )
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user/profile"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn passes_when_both_requests_are_refused() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = server_with_bearer_status(401).await;
        let client = client_for(&server)?;
        let mut log = ResultsLog::silent();

        assert!(run(&client, &mut log).await?);
        assert_eq!(log.len(), 2);
        assert_eq!(log.results()[0].name, NAME);
        assert_eq!(log.results()[1].name, INVALID_TOKEN_NAME);
        Ok(())
    }

    #[tokio::test]
    async fn fails_when_invalid_token_is_accepted() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = server_with_bearer_status(200).await;
        let client = client_for(&server)?;
        let mut log = ResultsLog::silent();

        assert!(!run(&client, &mut log).await?);
        assert!(log.results()[0].success);
        assert!(!log.results()[1].success);
        Ok(())
    }

    #[tokio::test]
    async fn fails_on_wrong_error_text() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "denied"})))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let mut log = ResultsLog::silent();
        assert!(!run(&client, &mut log).await?);
        assert_eq!(log.len(), 1);
        assert_eq!(log.results()[0].message, "Should return 'Unauthorized' error");
        Ok(())
    }

    #[tokio::test]
    async fn fails_when_profile_is_public() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"address": "0x"})))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let mut log = ResultsLog::silent();
        assert!(!run(&client, &mut log).await?);
        assert_eq!(log.results()[0].message, "Expected status 401, got 200");
        Ok(())
    }
}
