//! Report building across repositories

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};

use super::evaluator::Evaluator;
use super::record::{CheckFailure, ComplianceRecord};
use super::repository::RepositoryId;
use crate::error::ProviderError;

/// What to do when a repository cannot be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure in the report and continue
    #[default]
    SkipAndFlag,
    /// Stop at the first failure
    Halt,
}

/// Result of evaluating one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum Outcome {
    Evaluated(ComplianceRecord),
    Failed(CheckFailure),
}

/// One row of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub repository: RepositoryId,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Entries in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    entries: Vec<ReportEntry>,
}

impl ComplianceReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, repository: RepositoryId, outcome: Outcome) {
        self.entries.push(ReportEntry {
            repository,
            outcome,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ComplianceRecord> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            Outcome::Evaluated(record) => Some(record),
            Outcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckFailure> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            Outcome::Failed(failure) => Some(failure),
            Outcome::Evaluated(_) => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Any evaluated repository misses a check
    pub fn has_gaps(&self) -> bool {
        self.records().any(|record| !record.is_compliant())
    }

    pub fn compliant_count(&self) -> usize {
        self.records().filter(|record| record.is_compliant()).count()
    }
}

/// Evaluates repositories one after the other
pub struct ReportBuilder<'a> {
    evaluator: Evaluator<'a>,
    policy: FailurePolicy,
    timeout: Duration,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(evaluator: Evaluator<'a>) -> Self {
        Self {
            evaluator,
            policy: FailurePolicy::default(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Time budget for each repository
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Evaluate `repositories` in order.
    ///
    /// With [`FailurePolicy::Halt`] the first failure is returned as an error;
    /// otherwise it is recorded and evaluation continues.
    pub async fn build(
        &self,
        repositories: &[RepositoryId],
    ) -> Result<ComplianceReport, CheckFailure> {
        info!("Checking {} repositories", repositories.len());
        let mut report = ComplianceReport::new();

        for repo in repositories {
            let span = info_span!("repository", repository = %repo);
            let outcome = self.evaluate_one(repo).instrument(span).await;

            match outcome {
                Ok(record) => report.push(repo.clone(), Outcome::Evaluated(record)),
                Err(failure) => {
                    warn!(
                        repository = %repo,
                        check = %failure.check,
                        error = %failure.message,
                        "Repository evaluation failed"
                    );
                    if self.policy == FailurePolicy::Halt {
                        return Err(failure);
                    }
                    report.push(repo.clone(), Outcome::Failed(failure));
                }
            }
        }

        info!(
            "Report complete: {} evaluated, {} compliant, {} failed",
            report.records().count(),
            report.compliant_count(),
            report.failures().count(),
        );

        Ok(report)
    }

    async fn evaluate_one(&self, repo: &RepositoryId) -> Result<ComplianceRecord, CheckFailure> {
        match tokio::time::timeout(self.timeout, self.evaluator.evaluate_repository(repo)).await {
            Ok(result) => result,
            Err(_) => Err(CheckFailure::new(
                repo,
                "timeout",
                &ProviderError::Timeout {
                    seconds: self.timeout.as_secs(),
                },
            )),
        }
    }
}
