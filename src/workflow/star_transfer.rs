//! Copy stars from one account to another.

use crate::config::{DEFAULT_PER_PAGE, Settings, StarTransferConfig};
use crate::error::Result;
use crate::github::{GitHubClient, GitHubRepo, StarOps, starred_path};
use crate::mutation::{MutationLoop, Pacer, SuccessRule, classify};
use crate::pagination::Paginator;
use crate::report::RunReport;

/// GitHub answers a successful star with 204 and nothing else.
const STARRED: SuccessRule = SuccessRule::Exactly(204);

/// Stars, as the destination account, every repository the source
/// account has starred.
pub struct TransferStars {
    config: StarTransferConfig,
    source: GitHubClient,
    destination: GitHubClient,
    per_page: u32,
}

impl TransferStars {
    /// Validate `config` and prepare a run. `source` reads the stars,
    /// `destination` creates them.
    pub fn new(
        config: StarTransferConfig,
        source: GitHubClient,
        destination: GitHubClient,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            destination,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Build both clients from `settings` and the configured credentials.
    pub fn from_settings(config: StarTransferConfig, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let source = GitHubClient::new(config.source.token.clone(), settings)?;
        let destination = GitHubClient::new(config.destination.token.clone(), settings)?;
        Ok(Self::new(config, source, destination)?.per_page(settings.per_page))
    }

    /// Sets the page size used when reading the source stars.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Fetch the source stars and star each one as the destination.
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::new();

        tracing::info!("Fetching starred repos for {}...", self.config.source.login);
        let fetched = Paginator::new(&self.source, starred_path(&self.config.source.login))
            .per_page(self.per_page)
            .fetch_all();
        tracing::info!("Found {} starred repositories.", fetched.items.len());

        let mut targets = Vec::with_capacity(fetched.items.len());
        for (index, item) in fetched.items.iter().enumerate() {
            match GitHubRepo::from_value(item) {
                Some(repo) => targets.push(repo.id()),
                None => {
                    tracing::warn!("Skipping starred item {}: missing owner or name", index + 1);
                    report.skip(format!("item {}", index + 1));
                }
            }
        }

        tracing::info!("Starring as {}", self.config.destination.login);
        MutationLoop::new("star", Pacer::new(self.config.interval)).run(
            targets,
            &mut report,
            |repo| classify(STARRED, self.destination.star_repo(repo)),
        );

        report
    }
}
