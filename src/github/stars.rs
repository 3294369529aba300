//! Star operations.

use crate::error::Result;
use crate::github::client::segment;
use crate::github::{ApiResponse, GitHubClient, RepoId};

/// Path of the starred-repositories collection of `user`.
pub fn starred_path(user: &str) -> String {
    format!("/users/{}/starred", segment(user))
}

/// Star operations performed as the client's account.
pub trait StarOps {
    /// Star a repository. GitHub answers 204 on success, including when the
    /// repository was already starred.
    fn star_repo(&self, repo: &RepoId) -> Result<ApiResponse>;
}

impl StarOps for GitHubClient {
    fn star_repo(&self, repo: &RepoId) -> Result<ApiResponse> {
        let endpoint = format!(
            "/user/starred/{}/{}",
            segment(&repo.owner),
            segment(&repo.name)
        );
        self.put(&endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockResponse, MockTransport};
    use reqwest::Method;

    #[test]
    fn test_star_uses_put_without_body() {
        let mock = MockTransport::new();
        mock.on(Method::PUT, "/user/starred/rust-lang/rust", MockResponse::status(204));

        let client = GitHubClient::with_transport(Some("new-token".into()), mock.shared());
        let response = client.star_repo(&RepoId::new("rust-lang", "rust")).unwrap();
        assert_eq!(response.status, 204);

        let call = &mock.calls()[0];
        assert_eq!(call.method, Method::PUT);
        assert!(call.body.is_none());
        assert_eq!(call.token.as_deref(), Some("new-token"));
    }

    #[test]
    fn test_starred_path() {
        assert_eq!(starred_path("octocat"), "/users/octocat/starred");
    }
}
