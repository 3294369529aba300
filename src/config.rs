//! Run configuration for the migration workflows.
//!
//! Every workflow receives its configuration explicitly and validates it
//! once, before any network call is made.

use crate::error::{MigrateError, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default flat file shared by the lister and the ownership transferrer.
pub const DEFAULT_REPO_FILE: &str = "github_repos.csv";

/// Largest page size GitHub accepts for list endpoints.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// An access token and the account it authenticates as.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub login: String,
    pub token: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(login: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("login", &self.login)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Retry behaviour for transient failures (5xx, 429, connection errors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Whether a response status is worth another attempt.
    pub fn is_transient(status: u16) -> bool {
        status == 429 || (500..600).contains(&status)
    }

    /// Backoff before retry number `attempt` (starting at 1).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Settings shared by every API client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub per_page: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Settings {
    /// Creates settings pointing at github.com.
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            per_page: DEFAULT_PER_PAGE,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    /// Use a custom API base URL (GitHub Enterprise).
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.api_url = url;
        self
    }

    /// Sets the page size for collection endpoints.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(MigrateError::InvalidConfig("API URL is empty".into()));
        }
        if self.per_page == 0 || self.per_page > DEFAULT_PER_PAGE {
            return Err(MigrateError::InvalidConfig(format!(
                "per_page must be between 1 and {}, got {}",
                DEFAULT_PER_PAGE, self.per_page
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for listing a user's repositories.
#[derive(Debug, Clone)]
pub struct ListConfig {
    pub username: String,
    pub token: Option<String>,
    pub output: PathBuf,
}

impl ListConfig {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: None,
            output: PathBuf::from(DEFAULT_REPO_FILE),
        }
    }

    /// Authenticate with a token, enabling private repositories when it
    /// belongs to `username`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t: &String| !t.trim().is_empty());
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&[("username", &self.username)])
    }
}

/// Configuration for transferring repository ownership.
#[derive(Debug, Clone)]
pub struct RepoTransferConfig {
    pub token: String,
    pub old_owner: String,
    pub new_owner: String,
    pub input: PathBuf,
    /// Minimum pause between two transfer calls.
    pub interval: Duration,
}

impl RepoTransferConfig {
    pub fn new(
        token: impl Into<String>,
        old_owner: impl Into<String>,
        new_owner: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            old_owner: old_owner.into(),
            new_owner: new_owner.into(),
            input: PathBuf::from(DEFAULT_REPO_FILE),
            interval: Duration::from_secs(2),
        }
    }

    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&[
            ("token", &self.token),
            ("old_owner", &self.old_owner),
            ("new_owner", &self.new_owner),
        ])
    }
}

/// Configuration for copying stars from one account to another.
#[derive(Debug, Clone)]
pub struct StarTransferConfig {
    pub source: Credential,
    pub destination: Credential,
    /// Minimum pause between two star calls.
    pub interval: Duration,
}

impl StarTransferConfig {
    pub fn new(source: Credential, destination: Credential) -> Self {
        Self {
            source,
            destination,
            interval: Duration::ZERO,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&[
            ("source login", &self.source.login),
            ("source token", &self.source.token),
            ("destination login", &self.destination.login),
            ("destination token", &self.destination.token),
        ])
    }
}

/// Fails with every blank field named.
fn require(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MigrateError::InvalidConfig(format!(
            "missing required configuration: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_strip_trailing_slash() {
        let settings = Settings::new().api_url("https://ghe.example.com/api/v3//");
        assert_eq!(settings.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_settings_reject_oversized_pages() {
        assert!(Settings::new().validate().is_ok());
        assert!(Settings::new().per_page(0).validate().is_err());
        assert!(Settings::new().per_page(101).validate().is_err());
    }

    #[test]
    fn test_transfer_config_names_missing_fields() {
        let err = RepoTransferConfig::new("", "old", " ").validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("token"));
        assert!(msg.contains("new_owner"));
        assert!(!msg.contains("old_owner"));
    }

    #[test]
    fn test_star_config_requires_both_accounts() {
        let config = StarTransferConfig::new(
            Credential::new("old", "t1"),
            Credential::new("new", ""),
        );
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MigrateError::InvalidConfig(_)));
        assert!(err.to_string().contains("destination token"));

        let config = StarTransferConfig::new(
            Credential::new("old", "t1"),
            Credential::new("new", "t2"),
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_list_token_is_anonymous() {
        let config = ListConfig::new("octocat").token("  ");
        assert!(config.token.is_none());
        assert!(config.validate().is_ok());
        assert!(ListConfig::new("").validate().is_err());
    }

    #[test]
    fn test_credential_debug_hides_token() {
        let debug = format!("{:?}", Credential::new("octocat", "ghp_secret"));
        assert!(debug.contains("octocat"));
        assert!(!debug.contains("ghp_secret"));
    }

    #[test]
    fn test_retry_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
        };
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(5));
        assert_eq!(policy.delay_for(40), Duration::from_secs(5));
    }

    #[test]
    fn test_transient_statuses() {
        assert!(RetryPolicy::is_transient(500));
        assert!(RetryPolicy::is_transient(503));
        assert!(RetryPolicy::is_transient(429));
        assert!(!RetryPolicy::is_transient(403));
        assert!(!RetryPolicy::is_transient(404));
        assert!(!RetryPolicy::is_transient(200));
    }
}
