//! Page-numbered collection fetching.
//!
//! Pages are requested one at a time until GitHub returns an empty array.
//! A failed page ends the walk; whatever was collected before it is kept.

use crate::config::DEFAULT_PER_PAGE;
use crate::github::GitHubClient;
use serde_json::Value;

/// How a collection walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEnd {
    /// The server returned an empty page.
    Exhausted,
    /// A page could not be fetched or parsed.
    Failed { page: u32, reason: String },
}

/// Items collected by a [`Paginator`], in server order.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub items: Vec<Value>,
    /// Number of non-empty pages appended to `items`.
    pub pages: u32,
    pub end: PageEnd,
}

impl Fetched {
    /// Whether the walk stopped on an error rather than the end of data.
    pub fn is_truncated(&self) -> bool {
        matches!(self.end, PageEnd::Failed { .. })
    }
}

/// Walks a page-numbered collection endpoint.
pub struct Paginator<'a> {
    client: &'a GitHubClient,
    path: String,
    per_page: u32,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a GitHubClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Sets the page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Fetch every page into memory.
    pub fn fetch_all(&self) -> Fetched {
        let mut items = Vec::new();
        let mut page = 1;

        let end = loop {
            match self.fetch_page(page) {
                Ok(batch) if batch.is_empty() => break PageEnd::Exhausted,
                Ok(batch) => {
                    tracing::debug!("Fetched page {} of {} with {} items", page, self.path, batch.len());
                    items.extend(batch);
                    page += 1;
                }
                Err(reason) => {
                    tracing::error!("Failed to fetch page {} of {}: {}", page, self.path, reason);
                    break PageEnd::Failed { page, reason };
                }
            }
        };

        Fetched {
            items,
            pages: page - 1,
            end,
        }
    }

    fn fetch_page(&self, page: u32) -> std::result::Result<Vec<Value>, String> {
        let query = [("per_page", self.per_page.to_string()), ("page", page.to_string())];
        let response = self
            .client
            .get(&self.path, &query)
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        match response.json::<Value>() {
            Ok(Value::Array(batch)) => Ok(batch),
            Ok(other) => Err(format!("expected a JSON array, got {}", kind(&other))),
            Err(e) => Err(e.to_string()),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockResponse, MockTransport, repo_page};
    use reqwest::Method;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn client(mock: &MockTransport) -> GitHubClient {
        GitHubClient::with_transport(Some("t".into()), mock.shared())
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_full_page_then_empty() {
        let mock = MockTransport::new();
        mock.pages("/user/repos", vec![repo_page("me", "r", 100)]);

        let fetched = Paginator::new(&client(&mock), "/user/repos").fetch_all();
        assert_eq!(fetched.items.len(), 100);
        assert_eq!(fetched.pages, 1);
        assert_eq!(fetched.end, PageEnd::Exhausted);
        assert_eq!(mock.calls().len(), 2);
    }

    #[test]
    fn test_first_page_forbidden() {
        let mock = MockTransport::new();
        mock.on_page(
            "/users/x/repos",
            1,
            MockResponse::json(403, json!({"message": "rate limit exceeded"})),
        );

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        let fetched = tracing::subscriber::with_default(subscriber, || {
            Paginator::new(&client(&mock), "/users/x/repos").fetch_all()
        });

        assert!(fetched.items.is_empty());
        assert!(fetched.is_truncated());
        match &fetched.end {
            PageEnd::Failed { page, reason } => {
                assert_eq!(*page, 1);
                assert!(reason.contains("403"));
                assert!(reason.contains("rate limit exceeded"));
            }
            PageEnd::Exhausted => panic!("walk should have failed"),
        }
        assert_eq!(mock.calls().len(), 1);

        let output = logs.text();
        assert_eq!(output.matches("ERROR").count(), 1);
        assert!(output.contains("Failed to fetch page 1 of /users/x/repos"));
    }

    #[test]
    fn test_error_keeps_earlier_pages_in_order() {
        let mock = MockTransport::new();
        mock.on_page("/p", 1, MockResponse::json(200, json!([1, 2, 3])));
        mock.on_page("/p", 2, MockResponse::json(200, json!([4, 5])));
        mock.on_page("/p", 3, MockResponse::status(502));

        let fetched = Paginator::new(&client(&mock), "/p").fetch_all();
        assert_eq!(fetched.items, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
        assert_eq!(fetched.pages, 2);
        assert!(matches!(fetched.end, PageEnd::Failed { page: 3, .. }));
    }

    #[test]
    fn test_duplicates_from_server_are_kept() {
        let mock = MockTransport::new();
        mock.pages("/p", vec![vec![json!("a"), json!("b")], vec![json!("b")]]);

        let fetched = Paginator::new(&client(&mock), "/p").fetch_all();
        assert_eq!(fetched.items, vec![json!("a"), json!("b"), json!("b")]);
        assert_eq!(fetched.pages, 2);
    }

    #[test]
    fn test_non_array_body_ends_walk() {
        let mock = MockTransport::new();
        mock.on_page("/p", 1, MockResponse::json(200, json!({"items": []})));

        let fetched = Paginator::new(&client(&mock), "/p").fetch_all();
        assert!(fetched.items.is_empty());
        assert!(fetched.is_truncated());
    }

    #[test]
    fn test_network_error_ends_walk() {
        let mock = MockTransport::new();
        mock.on_page("/p", 1, MockResponse::json(200, json!([1])));
        mock.on_page("/p", 2, MockResponse::network_error("timed out"));

        let fetched = Paginator::new(&client(&mock), "/p").fetch_all();
        assert_eq!(fetched.items.len(), 1);
        assert!(matches!(fetched.end, PageEnd::Failed { page: 2, .. }));
    }

    #[test]
    fn test_page_size_sent() {
        let mock = MockTransport::new();
        Paginator::new(&client(&mock), "/p").per_page(30).fetch_all();

        let calls = mock.calls_for(Method::GET);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].page, Some(1));
        assert!(calls[0].query.contains(&("per_page".to_string(), "30".to_string())));
    }
}
