//! GitHub repository model and operations.

use crate::error::{MigrateError, Result};
use crate::github::client::segment;
use crate::github::{ApiResponse, GitHubClient};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Repository information from the GitHub API.
///
/// Only the fields the migration needs are kept; anything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubRepo {
    pub full_name: String,
    pub name: String,
    pub owner: RepoOwner,
}

/// Owner of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

impl GitHubRepo {
    /// Parse one raw collection item; `None` if a required field is absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let repo: Self = serde_json::from_value(value.clone()).ok()?;
        if repo.full_name.is_empty() || repo.name.is_empty() || repo.owner.login.is_empty() {
            return None;
        }
        Some(repo)
    }

    /// The owner/name identifier.
    pub fn id(&self) -> RepoId {
        RepoId::new(&self.owner.login, &self.name)
    }
}

/// Owner/name pair naming a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`, or a bare `name` owned by `default_owner`.
    pub fn parse(value: &str, default_owner: &str) -> Result<Self> {
        let value = value.trim();
        let (owner, name) = match value.split_once('/') {
            Some((owner, name)) => (owner.trim(), name.trim()),
            None => (default_owner.trim(), value),
        };

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(MigrateError::InvalidConfig(format!(
                "not a repository identifier: {:?}",
                value
            )));
        }
        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Which repository collection to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoListing {
    /// Every repository of the token owner, private ones included.
    Authenticated,
    /// Public repositories of the named user.
    Public(String),
}

impl RepoListing {
    /// Collection endpoint path.
    pub fn path(&self) -> String {
        match self {
            Self::Authenticated => "/user/repos".into(),
            Self::Public(user) => format!("/users/{}/repos", segment(user)),
        }
    }
}

/// Repository mutation operations.
pub trait RepoOps {
    /// Ask GitHub to transfer a repository to `new_owner`.
    ///
    /// Returns the raw response; GitHub answers 202 when the transfer has
    /// been accepted.
    fn transfer_repo(&self, repo: &RepoId, new_owner: &str) -> Result<ApiResponse>;
}

impl RepoOps for GitHubClient {
    fn transfer_repo(&self, repo: &RepoId, new_owner: &str) -> Result<ApiResponse> {
        let endpoint = format!(
            "/repos/{}/{}/transfer",
            segment(&repo.owner),
            segment(&repo.name)
        );
        self.post(&endpoint, serde_json::json!({ "new_owner": new_owner }))
    }
}
