//! Compliance evaluation
//!
//! Evaluation runs in two steps. [`Evaluator::fetch_snapshot`] gathers a
//! [`RawRepositorySnapshot`] through the gateway, then [`evaluate`] derives a
//! [`ComplianceRecord`] from it. `evaluate` is pure and total: any field the API
//! did not report counts as "not satisfied".

use std::collections::BTreeMap;
use tracing::debug;

use super::record::{Check, CheckFailure, ComplianceRecord};
use super::repository::RepositoryId;
use crate::config::RuleSet;
use crate::error::ProviderError;
use crate::providers::gateway::{
    canonical_issues_query, open_pull_requests_query, BranchRef, Gateway, RepositoryMetadata,
};

/// Everything fetched for one repository during one evaluation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRepositorySnapshot {
    pub repository: RepositoryId,
    pub metadata: RepositoryMetadata,
    pub labels: Vec<String>,
    pub branches: Vec<BranchRef>,
    /// Ref the file probes ran against
    pub file_ref: String,
    /// Existence per probed path
    pub files: BTreeMap<String, bool>,
    pub open_pull_requests: Option<u64>,
    /// Open issues labelled with this repository on the canonical repository;
    /// only fetched when issues are disabled here
    pub canonical_issue_count: Option<u64>,
    pub topics: Vec<String>,
}

impl RawRepositorySnapshot {
    /// A snapshot with nothing reported
    pub fn empty(repository: RepositoryId) -> Self {
        Self {
            repository,
            metadata: RepositoryMetadata::default(),
            labels: Vec::new(),
            branches: Vec::new(),
            file_ref: String::new(),
            files: BTreeMap::new(),
            open_pull_requests: None,
            canonical_issue_count: None,
            topics: Vec::new(),
        }
    }
}

/// Issues are tracked on the canonical repository.
///
/// Only an explicit `has_issues: false` counts; GitHub enables issues by
/// default, so a missing flag means enabled.
pub fn issues_disabled(metadata: &RepositoryMetadata) -> bool {
    metadata.has_issues == Some(false)
}

/// Ref the file checks run against
pub fn file_reference(metadata: &RepositoryMetadata, rules: &RuleSet) -> String {
    let branch = metadata
        .default_branch
        .as_deref()
        .filter(|branch| !branch.is_empty())
        .unwrap_or(&rules.fallback_branch);
    format!("refs/heads/{}", branch)
}

/// Presence of each `expected` name in `available`, exact match, in `expected` order
pub fn presence_checks(expected: &[String], available: &[String]) -> Vec<Check> {
    expected
        .iter()
        .map(|name| Check::new(name.as_str(), available.iter().any(|a| a == name)))
        .collect()
}

/// First candidate, in priority order, that names an existing branch
pub fn develop_branch(candidates: &[String], branches: &[BranchRef]) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| branches.iter().any(|branch| &branch.name == *candidate))
        .cloned()
}

/// Derive the compliance record for one snapshot
pub fn evaluate(snapshot: &RawRepositorySnapshot, rules: &RuleSet) -> ComplianceRecord {
    let metadata = &snapshot.metadata;
    let disabled = issues_disabled(metadata);

    let issue_count = if disabled {
        snapshot.canonical_issue_count.unwrap_or(0)
    } else {
        metadata.open_issues_count.unwrap_or(0)
    };

    let file_checks = rules
        .files
        .iter()
        .map(|path| {
            Check::new(
                path.as_str(),
                snapshot.files.get(path).copied().unwrap_or(false),
            )
        })
        .collect();

    ComplianceRecord {
        repository: snapshot.repository.clone(),
        url: metadata
            .html_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| snapshot.repository.default_url()),
        star_count: metadata.stargazers_count.unwrap_or(0),
        open_pull_request_count: snapshot.open_pull_requests.unwrap_or(0),
        issues_disabled_on_canonical_repo: disabled,
        issue_count,
        has_description: metadata
            .description
            .as_deref()
            .is_some_and(|d| !d.is_empty()),
        license: metadata
            .license
            .as_ref()
            .and_then(|license| license.spdx_id.clone())
            .unwrap_or_default(),
        label_checks: presence_checks(&rules.labels, &snapshot.labels),
        develop_branch: develop_branch(&rules.develop_branches, &snapshot.branches),
        file_ref: snapshot.file_ref.clone(),
        file_checks,
        topic_checks: presence_checks(&rules.topics, &snapshot.topics),
    }
}

/// Fetches snapshots through a gateway and evaluates them
pub struct Evaluator<'a> {
    gateway: &'a dyn Gateway,
    rules: &'a RuleSet,
    canonical: &'a RepositoryId,
}

impl<'a> Evaluator<'a> {
    pub fn new(gateway: &'a dyn Gateway, rules: &'a RuleSet, canonical: &'a RepositoryId) -> Self {
        Self {
            gateway,
            rules,
            canonical,
        }
    }

    /// Fetch and evaluate one repository
    pub async fn evaluate_repository(
        &self,
        repo: &RepositoryId,
    ) -> Result<ComplianceRecord, CheckFailure> {
        let snapshot = self.fetch_snapshot(repo).await?;
        Ok(evaluate(&snapshot, self.rules))
    }

    /// Gather every field the rules need for `repo`.
    ///
    /// Metadata is fetched first because it decides the file ref and the
    /// issue path; the remaining calls are independent and run concurrently.
    pub async fn fetch_snapshot(
        &self,
        repo: &RepositoryId,
    ) -> Result<RawRepositorySnapshot, CheckFailure> {
        let metadata = tag(repo, "repository", self.gateway.repository(repo).await)?;
        let file_ref = file_reference(&metadata, self.rules);
        let disabled = issues_disabled(&metadata);
        debug!(file_ref = %file_ref, issues_disabled = disabled, "Fetched metadata");

        let (open_pull_requests, labels, branches, files, topics, canonical_issue_count) =
            tokio::try_join!(
                self.fetch_open_pull_requests(repo),
                self.fetch_labels(repo),
                self.fetch_branches(repo),
                self.fetch_files(repo, &file_ref),
                self.fetch_topics(repo),
                self.fetch_canonical_issues(repo, disabled),
            )?;

        Ok(RawRepositorySnapshot {
            repository: repo.clone(),
            metadata,
            labels,
            branches,
            file_ref,
            files,
            open_pull_requests: Some(open_pull_requests),
            canonical_issue_count,
            topics,
        })
    }

    async fn fetch_open_pull_requests(&self, repo: &RepositoryId) -> Result<u64, CheckFailure> {
        let query = open_pull_requests_query(repo);
        tag(repo, "pull requests", self.gateway.search_total(&query).await)
    }

    async fn fetch_labels(&self, repo: &RepositoryId) -> Result<Vec<String>, CheckFailure> {
        tag(repo, "labels", self.gateway.labels(repo).await)
    }

    async fn fetch_branches(&self, repo: &RepositoryId) -> Result<Vec<BranchRef>, CheckFailure> {
        tag(repo, "branches", self.gateway.branches(repo).await)
    }

    async fn fetch_topics(&self, repo: &RepositoryId) -> Result<Vec<String>, CheckFailure> {
        tag(repo, "topics", self.gateway.topics(repo).await)
    }

    async fn fetch_files(
        &self,
        repo: &RepositoryId,
        reference: &str,
    ) -> Result<BTreeMap<String, bool>, CheckFailure> {
        let mut files = BTreeMap::new();
        for path in &self.rules.files {
            let exists = tag(
                repo,
                format!("file {}", path),
                self.gateway.file_exists(repo, path, reference).await,
            )?;
            debug!(path = %path, exists, "Checked file");
            files.insert(path.clone(), exists);
        }
        Ok(files)
    }

    async fn fetch_canonical_issues(
        &self,
        repo: &RepositoryId,
        disabled: bool,
    ) -> Result<Option<u64>, CheckFailure> {
        if !disabled {
            return Ok(None);
        }
        let query = canonical_issues_query(self.canonical, &repo.name);
        tag(repo, "issues", self.gateway.search_total(&query).await).map(Some)
    }
}

fn tag<T>(
    repo: &RepositoryId,
    check: impl Into<String>,
    result: Result<T, ProviderError>,
) -> Result<T, CheckFailure> {
    result.map_err(|err| CheckFailure::new(repo, check, &err))
}
