//! List a user's repositories into the flat file.

use crate::auth::{resolve_identity, select_listing};
use crate::config::{DEFAULT_PER_PAGE, ListConfig, Settings};
use crate::error::Result;
use crate::github::{GitHubClient, RepoListing};
use crate::pagination::{PageEnd, Paginator};
use crate::store::write_identifiers;

/// What a listing run produced.
#[derive(Debug, Clone)]
pub struct ListReport {
    pub listing: RepoListing,
    /// Items returned by GitHub.
    pub fetched: usize,
    /// Rows written to the output file.
    pub written: usize,
    /// Items without a `full_name`.
    pub skipped: usize,
    pub end: PageEnd,
}

/// Lists repositories of one user, private ones included when the token
/// belongs to that user, and writes their full names to a CSV file.
pub struct ListRepos {
    config: ListConfig,
    client: GitHubClient,
    per_page: u32,
}

impl ListRepos {
    /// Validate `config` and prepare a run using `client`.
    pub fn new(config: ListConfig, client: GitHubClient) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Build the client from `settings`, authenticated if a token is set.
    pub fn from_settings(config: ListConfig, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let client = match &config.token {
            Some(token) => GitHubClient::new(token.clone(), settings)?,
            None => GitHubClient::anonymous(settings)?,
        };
        Ok(Self::new(config, client)?.per_page(settings.per_page))
    }

    /// Sets the page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Fetch the collection and write the output file.
    pub fn run(&self) -> Result<ListReport> {
        let identity = resolve_identity(&self.client);
        let listing = select_listing(&self.config.username, identity.as_deref());

        match &listing {
            RepoListing::Authenticated => {
                tracing::info!("Fetching public and private repositories for the authenticated user.")
            }
            RepoListing::Public(user) => {
                tracing::info!("Fetching public repositories for {}.", user)
            }
        }

        let fetched = Paginator::new(&self.client, listing.path())
            .per_page(self.per_page)
            .fetch_all();
        tracing::info!("Total repositories fetched: {}", fetched.items.len());

        let mut names = Vec::with_capacity(fetched.items.len());
        for (index, item) in fetched.items.iter().enumerate() {
            match item.get("full_name").and_then(|v| v.as_str()) {
                Some(name) if !name.is_empty() => names.push(name.to_string()),
                _ => tracing::warn!("Skipping item {} without full_name", index + 1),
            }
        }

        let written = write_identifiers(&self.config.output, &names)?;
        tracing::info!("Saved {} repositories to {}", written, self.config.output.display());

        Ok(ListReport {
            listing,
            fetched: fetched.items.len(),
            written,
            skipped: fetched.items.len() - written,
            end: fetched.end,
        })
    }
}
