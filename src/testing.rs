//! Scripted in-memory transport for tests.
//!
//! Provides a [`MockTransport`] that answers API requests from a table of
//! canned responses without touching the network, and records every call.

use crate::error::{MigrateError, Result};
use crate::github::{ApiRequest, ApiResponse, Transport};
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A canned reply for one route.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Reply(ApiResponse),
    /// Simulate a connection-level failure.
    NetworkError(String),
}

impl MockResponse {
    /// Reply with a status and an empty body.
    pub fn status(status: u16) -> Self {
        Self::Reply(ApiResponse::new(status, ""))
    }

    /// Reply with a status and a raw body.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::Reply(ApiResponse::new(status, body))
    }

    /// Reply with a status and a JSON body.
    pub fn json(status: u16, body: Value) -> Self {
        Self::Reply(ApiResponse::new(status, body.to_string()))
    }

    /// Fail without a response.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError(message.into())
    }
}

/// Record of a request the mock received.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub method: Method,
    pub path: String,
    pub page: Option<u32>,
    pub query: Vec<(String, String)>,
    pub token: Option<String>,
    pub body: Option<Value>,
}

type RouteKey = (Method, String, Option<u32>);

#[derive(Default)]
struct MockState {
    routes: HashMap<RouteKey, MockResponse>,
    calls: Vec<MockCall>,
}

/// Transport that serves canned responses.
///
/// Routes are keyed by method, path and (for paginated GETs) the `page`
/// query parameter. Requests with no configured route receive a 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response for a route without a page number.
    pub fn on(&self, method: Method, path: &str, response: MockResponse) -> &Self {
        self.insert((method, path.to_string(), None), response);
        self
    }

    /// Configure the response for one page of a collection endpoint.
    pub fn on_page(&self, path: &str, page: u32, response: MockResponse) -> &Self {
        self.insert((Method::GET, path.to_string(), Some(page)), response);
        self
    }

    /// Configure consecutive pages starting at 1, followed by an empty page.
    pub fn pages(&self, path: &str, pages: Vec<Vec<Value>>) -> &Self {
        let count = pages.len() as u32;
        for (i, items) in pages.into_iter().enumerate() {
            self.on_page(path, i as u32 + 1, MockResponse::json(200, Value::Array(items)));
        }
        self.on_page(path, count + 1, MockResponse::json(200, Value::Array(Vec::new())));
        self
    }

    /// A shareable handle for [`crate::github::GitHubClient::with_transport`].
    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Requests received for a given method.
    pub fn calls_for(&self, method: Method) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    fn insert(&self, key: RouteKey, response: MockResponse) {
        self.lock().routes.insert(key, response);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let page = request.query_param("page").and_then(|p| p.parse().ok());
        let mut state = self.lock();

        state.calls.push(MockCall {
            method: request.method.clone(),
            path: request.path.clone(),
            page,
            query: request.query.clone(),
            token: request.token.clone(),
            body: request.body.clone(),
        });

        let response = state
            .routes
            .get(&(request.method.clone(), request.path.clone(), page))
            .or_else(|| {
                state
                    .routes
                    .get(&(request.method.clone(), request.path.clone(), None))
            })
            .cloned();

        match response {
            Some(MockResponse::Reply(reply)) => Ok(reply),
            Some(MockResponse::NetworkError(message)) => Err(MigrateError::Network { message }),
            None => Ok(ApiResponse::new(404, r#"{"message":"Not Found"}"#)),
        }
    }
}

/// A minimal repository object as GitHub returns it.
pub fn repo_json(owner: &str, name: &str) -> Value {
    serde_json::json!({
        "full_name": format!("{}/{}", owner, name),
        "name": name,
        "owner": { "login": owner },
        "private": false,
    })
}

/// `count` repositories owned by `owner`, named `{prefix}-{i}`.
pub fn repo_page(owner: &str, prefix: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| repo_json(owner, &format!("{}-{}", prefix, i)))
        .collect()
}
