//! Token identity resolution.
//!
//! Decides whether a listing may use the private+public endpoint of the
//! authenticated user or must fall back to the public endpoint.

use crate::github::{GitHubClient, RepoListing, UserOps};

/// Login of the account behind the client's token.
///
/// Returns `None` without a network call when the client has no token, and
/// `None` with an error logged when GitHub rejects the token. Never fatal.
pub fn resolve_identity(client: &GitHubClient) -> Option<String> {
    if !client.is_authenticated() {
        return None;
    }

    match client.authenticated_login() {
        Ok(login) => {
            tracing::debug!("Token authenticates as {}", login);
            Some(login)
        }
        Err(e) => {
            tracing::error!("Failed to authenticate with provided token: {}", e);
            None
        }
    }
}

/// Pick the repository collection for `username`.
pub fn select_listing(username: &str, identity: Option<&str>) -> RepoListing {
    match identity {
        Some(login) if login.eq_ignore_ascii_case(username) => RepoListing::Authenticated,
        _ => RepoListing::Public(username.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockResponse, MockTransport};
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn test_no_token_skips_network() {
        let mock = MockTransport::new();
        let client = GitHubClient::with_transport(None, mock.shared());

        assert_eq!(resolve_identity(&client), None);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_valid_token_resolves_login() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "/user", MockResponse::json(200, json!({"login": "Octocat"})));
        let client = GitHubClient::with_transport(Some("t".into()), mock.shared());

        assert_eq!(resolve_identity(&client).as_deref(), Some("Octocat"));
    }

    #[test]
    fn test_invalid_token_falls_back_to_public() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "/user",
            MockResponse::json(401, json!({"message": "Bad credentials"})),
        );
        let client = GitHubClient::with_transport(Some("bad".into()), mock.shared());

        let identity = resolve_identity(&client);
        assert_eq!(identity, None);
        assert_eq!(
            select_listing("octocat", identity.as_deref()),
            RepoListing::Public("octocat".into())
        );
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn test_network_failure_is_not_fatal() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "/user", MockResponse::network_error("connection reset"));
        let client = GitHubClient::with_transport(Some("t".into()), mock.shared());

        assert_eq!(resolve_identity(&client), None);
    }

    #[test]
    fn test_listing_match_is_case_insensitive() {
        assert_eq!(
            select_listing("octocat", Some("OctoCat")),
            RepoListing::Authenticated
        );
        assert_eq!(
            select_listing("octocat", Some("someone-else")),
            RepoListing::Public("octocat".into())
        );
        assert_eq!(
            select_listing("octocat", None),
            RepoListing::Public("octocat".into())
        );
    }
}
