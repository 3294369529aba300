//! Identity endpoint.

use crate::error::{MigrateError, Result};
use crate::github::GitHubClient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AuthenticatedUser {
    login: Option<String>,
}

/// User lookups.
pub trait UserOps {
    /// Login of the account the client's token belongs to.
    fn authenticated_login(&self) -> Result<String>;
}

impl UserOps for GitHubClient {
    fn authenticated_login(&self) -> Result<String> {
        let response = self.get("/user", &[])?;
        let status = response.status;
        let user: AuthenticatedUser = response.error_for_status()?.json()?;

        user.login
            .filter(|l| !l.is_empty())
            .ok_or_else(|| MigrateError::GitHub {
                status,
                message: "identity response has no login".into(),
            })
    }
}
