//! Gateway trait over the GitHub REST and GraphQL APIs
//!
//! Everything the evaluator needs from GitHub goes through [`Gateway`], so the
//! evaluator never sees which endpoint answered and tests can swap in an
//! in-memory implementation.

use serde::{Deserialize, Serialize};

use crate::compliance::RepositoryId;
use crate::error::ProviderError;

/// Repository metadata from `GET /repos/{owner}/{repo}`.
///
/// Every field is optional: a missing field evaluates as "not satisfied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub license: Option<LicenseInfo>,
    pub stargazers_count: Option<u64>,
    pub has_issues: Option<bool>,
    pub open_issues_count: Option<u64>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub spdx_id: Option<String>,
}

/// A branch head, keyed by its GraphQL node id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub node_id: String,
    pub name: String,
}

impl BranchRef {
    pub fn new(node_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            name: name.into(),
        }
    }
}

/// The parts of a pull request the issue-linking helper reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(rename = "_links")]
    pub links: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueInfo {
    pub number: u64,
    pub title: Option<String>,
    pub state: Option<String>,
    pub html_url: Option<String>,
}

/// Kind of an entry returned by the contents API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

/// Read-only access to the hosting API
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Repository metadata
    async fn repository(&self, repo: &RepositoryId) -> Result<RepositoryMetadata, ProviderError>;

    /// `total_count` of an issue search query
    async fn search_total(&self, query: &str) -> Result<u64, ProviderError>;

    /// Label names, in API order
    async fn labels(&self, repo: &RepositoryId) -> Result<Vec<String>, ProviderError>;

    /// Branch heads, in API order
    async fn branches(&self, repo: &RepositoryId) -> Result<Vec<BranchRef>, ProviderError>;

    /// Whether `path` exists at `reference`
    async fn file_exists(
        &self,
        repo: &RepositoryId,
        path: &str,
        reference: &str,
    ) -> Result<bool, ProviderError>;

    /// Repository topics (first ten)
    async fn topics(&self, repo: &RepositoryId) -> Result<Vec<String>, ProviderError>;

    async fn pull_request(
        &self,
        repo: &RepositoryId,
        number: u64,
    ) -> Result<PullRequestInfo, ProviderError>;

    async fn issue(&self, repo: &RepositoryId, number: u64) -> Result<IssueInfo, ProviderError>;

    /// Directory listing; a file path lists the file itself
    async fn contents(
        &self,
        repo: &RepositoryId,
        path: Option<&str>,
    ) -> Result<Vec<ContentEntry>, ProviderError>;
}

/// `repo:ORG/NAME is:open is:pr`
pub fn open_pull_requests_query(repo: &RepositoryId) -> String {
    format!("repo:{} is:open is:pr", repo.full_name())
}

/// `repo:CANONICAL is:open is:issue label:"NAME"`
pub fn canonical_issues_query(canonical: &RepositoryId, label: &str) -> String {
    format!(
        "repo:{} is:open is:issue label:\"{}\"",
        canonical.full_name(),
        label
    )
}
