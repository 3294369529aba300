//! GitHub API integration for account migration.
//!
//! This module provides a blocking client for the handful of endpoints the
//! migration workflows touch:
//! - Resolve the account behind a token
//! - Page through repository and star collections
//! - Transfer repository ownership
//! - Star repositories
//!
//! # Example
//!
//! ```rust,no_run
//! use account_migrate::config::Settings;
//! use account_migrate::github::{GitHubClient, RepoId, StarOps};
//!
//! let client = GitHubClient::new("ghp_your_token_here", &Settings::new())?;
//! let response = client.star_repo(&RepoId::new("rust-lang", "rust"))?;
//! println!("GitHub answered {}", response.status);
//! # Ok::<(), account_migrate::error::MigrateError>(())
//! ```

mod client;
mod repos;
mod stars;
mod transport;
mod users;

pub use client::GitHubClient;
pub use repos::{GitHubRepo, RepoId, RepoListing, RepoOps, RepoOwner};
pub use stars::{StarOps, starred_path};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use users::UserOps;
