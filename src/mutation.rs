//! Paced, sequential per-item mutations.
//!
//! Each item gets exactly one call. Failures are recorded and the loop
//! moves on; nothing here aborts a run.

use crate::error::Result;
use crate::github::ApiResponse;
use crate::report::{Outcome, RunReport};
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Which responses count as success for a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRule {
    /// Any 2xx status.
    AnySuccess,
    /// Only this exact status.
    Exactly(u16),
}

impl SuccessRule {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::AnySuccess => (200..300).contains(&status),
            Self::Exactly(expected) => status == *expected,
        }
    }
}

/// Turn the result of a mutating call into an outcome.
pub fn classify(rule: SuccessRule, result: Result<ApiResponse>) -> Outcome {
    match result {
        Ok(response) if rule.accepts(response.status) => Outcome::Succeeded,
        Ok(response) => Outcome::failed(Some(response.status), response.body),
        Err(e) => Outcome::failed(e.status(), e.to_string()),
    }
}

/// Enforces a minimum interval between consecutive calls.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `call` once the interval since the previous call has elapsed.
    pub fn pace<R>(&mut self, call: impl FnOnce() -> R) -> R {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        let result = call();
        self.last = Some(Instant::now());
        result
    }
}

/// Applies one mutating call per item, in order.
pub struct MutationLoop {
    action: String,
    pacer: Pacer,
}

impl MutationLoop {
    /// `action` names the mutation in log lines (e.g. "transfer").
    pub fn new(action: impl Into<String>, pacer: Pacer) -> Self {
        Self {
            action: action.into(),
            pacer,
        }
    }

    /// Run `act` for every item and record each outcome in `report`.
    pub fn run<T, I, F>(mut self, items: I, report: &mut RunReport, mut act: F)
    where
        I: IntoIterator<Item = T>,
        T: Display,
        F: FnMut(&T) -> Outcome,
    {
        for item in items {
            let identifier = item.to_string();
            tracing::info!("Processing {}", identifier);

            let outcome = self.pacer.pace(|| act(&item));
            match &outcome {
                Outcome::Succeeded => {
                    tracing::info!("{} {} succeeded", identifier, self.action)
                }
                Outcome::Failed(detail) => {
                    tracing::error!("{} {} failed: {}", identifier, self.action, detail)
                }
            }
            report.record(identifier, outcome);
        }
    }
}
