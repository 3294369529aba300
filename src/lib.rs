//! # Account Migrate
//!
//! Utilities for moving a GitHub presence from one account to another.
//!
//! This crate provides three workflows:
//! - Listing a user's repositories into a CSV file
//! - Transferring ownership of every repository in that file
//! - Copying starred repositories from one account to another
//!
//! All three follow the same shape: page through a collection, then make
//! one paced, sequential call per item, recording each success or failure
//! without ever aborting the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use account_migrate::prelude::*;
//!
//! let settings = Settings::new();
//!
//! // Write every repository of `octocat` to github_repos.csv
//! let config = ListConfig::new("octocat").token("ghp_your_token_here");
//! let listed = ListRepos::from_settings(config, &settings)?.run()?;
//! println!("Wrote {} repositories", listed.written);
//!
//! // Hand them over to a new owner
//! let config = RepoTransferConfig::new("ghp_your_token_here", "octocat", "octo-org");
//! let report = TransferRepos::from_settings(config, &settings)?.run();
//! report.log_summary("Transfer");
//! # Ok::<(), account_migrate::error::MigrateError>(())
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod mutation;
pub mod pagination;
pub mod report;
pub mod store;
pub mod telemetry;
pub mod testing;
pub mod workflow;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::auth::{resolve_identity, select_listing};
    pub use crate::config::{
        Credential, ListConfig, RepoTransferConfig, RetryPolicy, Settings, StarTransferConfig,
    };
    pub use crate::error::{MigrateError, Result};
    pub use crate::github::{
        ApiResponse, GitHubClient, GitHubRepo, RepoId, RepoListing, RepoOps, StarOps, UserOps,
    };
    pub use crate::mutation::{MutationLoop, Pacer, SuccessRule};
    pub use crate::pagination::{Fetched, PageEnd, Paginator};
    pub use crate::report::{FailureDetail, Outcome, RunReport, Summary, TransferRecord};
    pub use crate::store::{Records, read_identifiers, write_identifiers};
    pub use crate::workflow::{ListReport, ListRepos, TransferRepos, TransferStars};
}

pub use prelude::*;
