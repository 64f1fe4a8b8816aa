use crate::APP_USER_AGENT;
use reqwest::{header::HeaderMap, Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Errors that abort a single check. The runner turns these into failing results.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported scheme {0}, expected http or https")]
    UnsupportedScheme(String),
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON.
    ///
    /// # Errors
    /// Returns `CheckError::Json` if the body is not valid JSON.
    pub fn json(&self) -> Result<Value, CheckError> {
        serde_json::from_str(&self.body).map_err(|source| CheckError::Json {
            url: self.url.clone(),
            source,
        })
    }

    /// Body as attached to a failing result: JSON when it parses, raw text otherwise.
    #[must_use]
    pub fn details(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }
}

/// HTTP client bound to the base URL of the service under test.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the base URL is not http(s) or the client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CheckError> {
        let url = Url::parse(base_url)?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(CheckError::UnsupportedScheme(scheme.to_string())),
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Join a route onto the base URL without dropping the base path (`/api`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// # Errors
    /// Returns an error if the request cannot be sent or its body cannot be read.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, CheckError> {
        let url = self.url(path);
        self.send(Method::GET, &url, self.http.get(&url)).await
    }

    /// GET with a per-request timeout overriding the client default.
    ///
    /// # Errors
    /// Returns an error if the request cannot be sent or times out.
    pub async fn get_with_timeout(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<ApiResponse, CheckError> {
        let url = self.url(path);
        self.send(Method::GET, &url, self.http.get(&url).timeout(timeout))
            .await
    }

    /// # Errors
    /// Returns an error if the request cannot be sent or its body cannot be read.
    pub async fn get_with_bearer(&self, path: &str, token: &str) -> Result<ApiResponse, CheckError> {
        let url = self.url(path);
        self.send(Method::GET, &url, self.http.get(&url).bearer_auth(token))
            .await
    }

    /// # Errors
    /// Returns an error if the request cannot be sent or its body cannot be read.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<ApiResponse, CheckError> {
        let url = self.url(path);
        self.send(Method::POST, &url, self.http.post(&url).json(body))
            .await
    }

    /// # Errors
    /// Returns an error if the request cannot be sent or its body cannot be read.
    pub async fn options(&self, path: &str) -> Result<ApiResponse, CheckError> {
        let url = self.url(path);
        self.send(Method::OPTIONS, &url, self.http.request(Method::OPTIONS, &url))
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<ApiResponse, CheckError> {
        let span = info_span!("wallet2fa.request", http.method = %method, url = %url);

        let response = request.send().instrument(span.clone()).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().instrument(span).await?;

        debug!("{method} {url} -> {status}");

        Ok(ApiResponse {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }
}
