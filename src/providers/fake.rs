//! In-memory gateway for tests

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::gateway::{
    open_pull_requests_query, BranchRef, ContentEntry, Gateway, IssueInfo, LicenseInfo,
    PullRequestInfo, RepositoryMetadata,
};
use crate::compliance::RepositoryId;
use crate::config::{DEFAULT_FILES, DEFAULT_LABELS, DEFAULT_TOPICS};
use crate::error::ProviderError;

/// Canned data for one repository
#[derive(Debug, Clone, Default)]
pub struct FakeRepository {
    pub metadata: RepositoryMetadata,
    pub labels: Vec<String>,
    pub branches: Vec<BranchRef>,
    pub files: BTreeMap<String, bool>,
    pub topics: Vec<String>,
    pub open_pull_requests: u64,
    pub pull_requests: HashMap<u64, PullRequestInfo>,
    pub issues: HashMap<u64, IssueInfo>,
    pub contents: HashMap<String, Vec<ContentEntry>>,
    pub latency: Duration,
}

#[derive(Default)]
pub struct FakeGateway {
    repositories: HashMap<RepositoryId, FakeRepository>,
    search_totals: HashMap<String, u64>,
    failing: HashSet<(String, RepositoryId)>,
    queries: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

fn not_found(route: String) -> ProviderError {
    ProviderError::Api {
        route,
        status: 404,
        message: "Not Found".to_string(),
        retry_after: None,
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository that satisfies every default rule
    pub fn module_fixture(
        name: &str,
        has_issues: bool,
        default_branch: Option<&str>,
    ) -> FakeRepository {
        let mut labels: Vec<String> = DEFAULT_LABELS.iter().map(|s| s.to_string()).collect();
        labels.push("bug".to_string());

        FakeRepository {
            metadata: RepositoryMetadata {
                html_url: Some(format!("https://github.com/PrestaShop/{}", name)),
                description: Some(format!("{} module", name)),
                license: Some(LicenseInfo {
                    spdx_id: Some("AFL-3.0".to_string()),
                }),
                stargazers_count: Some(42),
                has_issues: Some(has_issues),
                open_issues_count: Some(5),
                default_branch: default_branch.map(str::to_string),
            },
            labels,
            branches: vec![
                BranchRef::new("node-master", "master"),
                BranchRef::new("node-dev", "dev"),
            ],
            files: DEFAULT_FILES
                .iter()
                .map(|path| (path.to_string(), true))
                .collect(),
            topics: DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect(),
            open_pull_requests: 3,
            ..Default::default()
        }
    }

    pub fn with_repository(mut self, id: RepositoryId, repository: FakeRepository) -> Self {
        self.search_totals
            .insert(open_pull_requests_query(&id), repository.open_pull_requests);
        self.repositories.insert(id, repository);
        self
    }

    pub fn with_search_total(mut self, query: &str, total: u64) -> Self {
        self.search_totals.insert(query.to_string(), total);
        self
    }

    /// Make `method` fail for `repo` with a server error
    pub fn failing_on(mut self, method: &str, repo: &RepositoryId) -> Self {
        self.failing.insert((method.to_string(), repo.clone()));
        self
    }

    /// Search queries received, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// `method owner/name` for every repository call received, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn lookup(
        &self,
        method: &str,
        repo: &RepositoryId,
    ) -> Result<&FakeRepository, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", method, repo));

        if self.failing.contains(&(method.to_string(), repo.clone())) {
            return Err(ProviderError::Api {
                route: format!("/repos/{}", repo),
                status: 500,
                message: "Internal Server Error".to_string(),
                retry_after: None,
            });
        }

        let repository = self
            .repositories
            .get(repo)
            .ok_or_else(|| not_found(format!("/repos/{}", repo)))?;
        if !repository.latency.is_zero() {
            tokio::time::sleep(repository.latency).await;
        }
        Ok(repository)
    }
}

#[async_trait::async_trait]
impl Gateway for FakeGateway {
    async fn repository(&self, repo: &RepositoryId) -> Result<RepositoryMetadata, ProviderError> {
        Ok(self.lookup("repository", repo).await?.metadata.clone())
    }

    async fn search_total(&self, query: &str) -> Result<u64, ProviderError> {
        self.queries.lock().unwrap().push(query.to_string());
        let failing = self
            .failing
            .iter()
            .any(|(method, repo)| method == "search" && query.contains(&repo.full_name()));
        if failing {
            return Err(ProviderError::Transport {
                route: "/search/issues".to_string(),
                message: "connection reset".to_string(),
            });
        }
        Ok(self.search_totals.get(query).copied().unwrap_or(0))
    }

    async fn labels(&self, repo: &RepositoryId) -> Result<Vec<String>, ProviderError> {
        Ok(self.lookup("labels", repo).await?.labels.clone())
    }

    async fn branches(&self, repo: &RepositoryId) -> Result<Vec<BranchRef>, ProviderError> {
        Ok(self.lookup("branches", repo).await?.branches.clone())
    }

    async fn file_exists(
        &self,
        repo: &RepositoryId,
        path: &str,
        _reference: &str,
    ) -> Result<bool, ProviderError> {
        let repository = self.lookup("file_exists", repo).await?;
        Ok(repository.files.get(path).copied().unwrap_or(false))
    }

    async fn topics(&self, repo: &RepositoryId) -> Result<Vec<String>, ProviderError> {
        Ok(self.lookup("topics", repo).await?.topics.clone())
    }

    async fn pull_request(
        &self,
        repo: &RepositoryId,
        number: u64,
    ) -> Result<PullRequestInfo, ProviderError> {
        self.lookup("pull_request", repo)
            .await?
            .pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| not_found(format!("/repos/{}/pulls/{}", repo, number)))
    }

    async fn issue(&self, repo: &RepositoryId, number: u64) -> Result<IssueInfo, ProviderError> {
        self.lookup("issue", repo)
            .await?
            .issues
            .get(&number)
            .cloned()
            .ok_or_else(|| not_found(format!("/repos/{}/issues/{}", repo, number)))
    }

    async fn contents(
        &self,
        repo: &RepositoryId,
        path: Option<&str>,
    ) -> Result<Vec<ContentEntry>, ProviderError> {
        let key = path.unwrap_or("").trim_matches('/').to_string();
        self.lookup("contents", repo)
            .await?
            .contents
            .get(&key)
            .cloned()
            .ok_or_else(|| not_found(format!("/repos/{}/contents/{}", repo, key)))
    }
}
