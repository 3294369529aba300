//! GitHub API client.

use crate::config::Settings;
use crate::error::Result;
use crate::github::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Client for interacting with the GitHub API as one account (or anonymously).
#[derive(Clone)]
pub struct GitHubClient {
    pub(crate) token: Option<String>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: impl Into<String>, settings: &Settings) -> Result<Self> {
        Ok(Self::with_transport(
            Some(token.into()),
            Arc::new(HttpTransport::new(settings)?),
        ))
    }

    /// Create a client without credentials; only public data is reachable.
    pub fn anonymous(settings: &Settings) -> Result<Self> {
        Ok(Self::with_transport(None, Arc::new(HttpTransport::new(settings)?)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(token: Option<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            transport,
        }
    }

    /// Whether requests carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Send a request with this client's credentials attached.
    pub fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let request = request.token(self.token.as_deref());
        self.transport.execute(&request)
    }

    /// Make a GET request to the GitHub API.
    pub(crate) fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        let request = query
            .iter()
            .fold(ApiRequest::new(Method::GET, path), |r, (k, v)| r.query(k, v));
        self.send(request)
    }

    /// Make a POST request with a JSON body.
    pub(crate) fn post(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.send(ApiRequest::new(Method::POST, path).json(body))
    }

    /// Make a body-less PUT request.
    pub(crate) fn put(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::new(Method::PUT, path))
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Percent-encode one path segment (an owner or repository name).
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
