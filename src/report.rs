//! Per-item outcomes and the end-of-run summary.

use std::fmt;

/// Why an item's mutation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of one mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(FailureDetail),
}

impl Outcome {
    pub fn failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Failed(FailureDetail {
            status,
            message: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// One attempted item and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub identifier: String,
    pub outcome: Outcome,
}

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Every item the run saw, attempted or not.
    pub fn total(&self) -> usize {
        self.attempted + self.skipped
    }
}

/// Outcomes of one workflow run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    records: Vec<TransferRecord>,
    skipped: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outcome of an attempted item.
    pub fn record(&mut self, identifier: impl Into<String>, outcome: Outcome) {
        self.records.push(TransferRecord {
            identifier: identifier.into(),
            outcome,
        });
    }

    /// Note an item that was never attempted because it was malformed.
    pub fn skip(&mut self, description: impl Into<String>) {
        self.skipped.push(description.into());
    }

    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Identifiers that succeeded, in order.
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|r| r.outcome.is_success())
            .map(|r| r.identifier.as_str())
    }

    /// Identifiers that failed with their detail, in order.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &FailureDetail)> {
        self.records.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed(detail) => Some((r.identifier.as_str(), detail)),
            Outcome::Succeeded => None,
        })
    }

    pub fn summary(&self) -> Summary {
        let succeeded = self.succeeded().count();
        Summary {
            attempted: self.records.len(),
            succeeded,
            failed: self.records.len() - succeeded,
            skipped: self.skipped.len(),
        }
    }

    /// Log counts and every failed identifier.
    pub fn log_summary(&self, label: &str) {
        let summary = self.summary();
        tracing::info!("{} summary:", label);
        tracing::info!("Succeeded: {}", summary.succeeded);
        tracing::info!("Failed: {}", summary.failed);
        if summary.skipped > 0 {
            tracing::info!("Skipped (malformed): {}", summary.skipped);
        }

        if summary.failed > 0 {
            tracing::info!("Failed items:");
            for (identifier, detail) in self.failed() {
                tracing::info!("- {} ({})", identifier, detail);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_every_item() {
        let mut report = RunReport::new();
        report.record("a/one", Outcome::Succeeded);
        report.record("a/two", Outcome::failed(Some(404), "Not Found"));
        report.skip("row 3: empty identifier");
        report.record("a/three", Outcome::Succeeded);

        let summary = report.summary();
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.succeeded + summary.failed + summary.skipped, 4);
    }

    #[test]
    fn test_identifier_sequences_keep_order() {
        let mut report = RunReport::new();
        report.record("z", Outcome::Succeeded);
        report.record("y", Outcome::failed(None, "connection reset"));
        report.record("x", Outcome::Succeeded);
        report.record("w", Outcome::failed(Some(500), "boom"));

        assert_eq!(report.succeeded().collect::<Vec<_>>(), vec!["z", "x"]);
        let failed: Vec<_> = report.failed().map(|(id, _)| id).collect();
        assert_eq!(failed, vec!["y", "w"]);
    }

    #[test]
    fn test_failure_detail_display() {
        let with_status = FailureDetail {
            status: Some(422),
            message: "already exists".into(),
        };
        assert_eq!(with_status.to_string(), "422 already exists");

        let without = FailureDetail {
            status: None,
            message: "timed out".into(),
        };
        assert_eq!(without.to_string(), "timed out");
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::new();
        assert_eq!(report.summary(), Summary::default());
        report.log_summary("Nothing");
    }
}
