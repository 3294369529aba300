//! HTTP transport for the GitHub API.
//!
//! The [`Transport`] trait is the seam between the API client and the wire.
//! [`HttpTransport`] talks to GitHub over blocking reqwest and retries
//! transient failures; tests substitute [`crate::testing::MockTransport`].

use crate::config::{RetryPolicy, Settings};
use crate::error::{MigrateError, Result};
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_LENGTH, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// A single API call, independent of how it is sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API root, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    /// Value of a query parameter, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Convert a non-2xx response into an error carrying status and body.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(MigrateError::GitHub {
                status: self.status,
                message: self.body,
            })
        }
    }
}

/// Sends API requests.
pub trait Transport: Send + Sync {
    /// Send a request. A response with any status is `Ok`; only failures
    /// to obtain a response at all are errors.
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Blocking reqwest transport with bounded retry.
pub struct HttpTransport {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport from shared settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            client,
            retry: settings.retry.clone(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the default headers for API requests.
    fn headers(&self, token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                MigrateError::InvalidConfig("token contains invalid header characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("account-migrate"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    fn send_once(&self, request: &ApiRequest) -> Result<(ApiResponse, Option<Duration>)> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(self.headers(request.token.as_deref())?);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            Some(body) => builder.json(body),
            // GitHub rejects body-less PUTs without an explicit zero length
            None if request.method != Method::GET => builder.header(CONTENT_LENGTH, 0),
            None => builder,
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.text().unwrap_or_default();

        Ok((ApiResponse { status, body }, retry_after))
    }
}

/// Methods that can be resent without repeating a side effect.
fn is_idempotent(method: &Method) -> bool {
    [Method::GET, Method::HEAD, Method::PUT, Method::DELETE, Method::OPTIONS].contains(method)
}

impl Transport for HttpTransport {
    /// Sends `request`, retrying transient failures.
    ///
    /// Idempotent methods are retried on 429, 5xx and any network error.
    /// Other methods (the transfer POST) are only retried when the
    /// connection could not be opened, since the server never saw them.
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let idempotent = is_idempotent(&request.method);
        let mut attempt = 0;

        loop {
            let can_retry = attempt < self.retry.max_retries;
            attempt += 1;

            match self.send_once(request) {
                Ok((response, retry_after))
                    if can_retry && idempotent && RetryPolicy::is_transient(response.status) =>
                {
                    let delay = retry_after
                        .map(|d| d.min(self.retry.max_delay))
                        .unwrap_or_else(|| self.retry.delay_for(attempt));
                    tracing::warn!(
                        "{} {} returned {}, retrying in {:?} (attempt {} of {})",
                        request.method,
                        request.path,
                        response.status,
                        delay,
                        attempt,
                        self.retry.max_retries
                    );
                    std::thread::sleep(delay);
                }
                Ok((response, _)) => return Ok(response),
                Err(MigrateError::Http(e)) if can_retry && (idempotent || e.is_connect()) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "{} {} failed: {}, retrying in {:?}",
                        request.method,
                        request.path,
                        e,
                        delay
                    );
                    std::thread::sleep(delay);
                }
                Err(MigrateError::Http(e)) => {
                    return Err(MigrateError::Network {
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
