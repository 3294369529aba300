//! Transfer ownership of every repository listed in the flat file.

use crate::config::{RepoTransferConfig, Settings};
use crate::error::Result;
use crate::github::{GitHubClient, RepoId, RepoOps};
use crate::mutation::{MutationLoop, Pacer, SuccessRule, classify};
use crate::report::RunReport;
use crate::store::read_identifiers;

/// Moves repositories from `old_owner` to `new_owner`, one paced call each.
pub struct TransferRepos {
    config: RepoTransferConfig,
    client: GitHubClient,
}

impl TransferRepos {
    /// Validate `config` and prepare a run using `client`.
    pub fn new(config: RepoTransferConfig, client: GitHubClient) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, client })
    }

    /// Build the client from `settings` and the configured token.
    pub fn from_settings(config: RepoTransferConfig, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let client = GitHubClient::new(config.token.clone(), settings)?;
        Self::new(config, client)
    }

    /// Transfer every listed repository.
    ///
    /// A missing or unreadable input file is logged and produces an empty
    /// report; no repository is touched in that case.
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::new();

        let records = match read_identifiers(&self.config.input) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Cannot read {}: {}", self.config.input.display(), e);
                return report;
            }
        };

        for row in &records.skipped_rows {
            report.skip(format!("row {}: no identifier", row));
        }

        let mut targets = Vec::with_capacity(records.identifiers.len());
        for identifier in &records.identifiers {
            match RepoId::parse(identifier, &self.config.old_owner) {
                Ok(repo) if repo.owner.eq_ignore_ascii_case(&self.config.old_owner) => {
                    targets.push(repo);
                }
                Ok(repo) => {
                    tracing::warn!("Skipping {}: not owned by {}", repo, self.config.old_owner);
                    report.skip(identifier.clone());
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", identifier, e);
                    report.skip(identifier.clone());
                }
            }
        }

        tracing::info!(
            "Transferring {} repositories to {}",
            targets.len(),
            self.config.new_owner
        );

        let new_owner = self.config.new_owner.as_str();
        MutationLoop::new("transfer", Pacer::new(self.config.interval)).run(
            targets,
            &mut report,
            |repo| classify(SuccessRule::AnySuccess, self.client.transfer_repo(repo, new_owner)),
        );

        report
    }
}
