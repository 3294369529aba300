//! The three migration workflows.
//!
//! Each one validates its configuration up front, then runs a single
//! sequential pipeline:
//!
//! - [`ListRepos`]: identity → paginated listing → CSV file
//! - [`TransferRepos`]: CSV file → paced ownership transfers → report
//! - [`TransferStars`]: paginated stars (source) → paced stars (destination) → report
//!
//! # Example
//!
//! ```rust,no_run
//! use account_migrate::config::{Credential, Settings, StarTransferConfig};
//! use account_migrate::workflow::TransferStars;
//!
//! let config = StarTransferConfig::new(
//!     Credential::new("old-me", "ghp_old"),
//!     Credential::new("new-me", "ghp_new"),
//! );
//! let report = TransferStars::from_settings(config, &Settings::new())?.run();
//! report.log_summary("Star transfer");
//! # Ok::<(), account_migrate::error::MigrateError>(())
//! ```

mod list;
mod repo_transfer;
mod star_transfer;

pub use list::{ListReport, ListRepos};
pub use repo_transfer::TransferRepos;
pub use star_transfer::TransferStars;
