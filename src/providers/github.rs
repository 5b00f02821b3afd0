//! GitHub provider - Interactions with the GitHub API via octocrab

use octocrab::Octocrab;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

use super::gateway::{
    BranchRef, ContentEntry, Gateway, IssueInfo, PullRequestInfo, RepositoryMetadata,
};
use super::retry::RetryPolicy;
use crate::compliance::RepositoryId;
use crate::error::ProviderError;

/// Page size for paginated list endpoints
const PER_PAGE: usize = 100;

const TOPICS_QUERY: &str = r#"query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    repositoryTopics(first: 10) {
      edges {
        node {
          topic {
            name
          }
        }
      }
    }
  }
}"#;

/// GitHub provider for read-only repository queries
pub struct GitHubProvider {
    client: Octocrab,
    retry: RetryPolicy,
    authenticated: bool,
}

#[derive(Debug, Deserialize)]
struct SearchTotal {
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct LabelName {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    reference: Option<String>,
    node_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestTopics {
    #[serde(default)]
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentListing {
    Directory(Vec<ContentEntry>),
    Single(ContentEntry),
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TopicsData {
    repository: Option<TopicsRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicsRepository {
    repository_topics: Option<TopicConnection>,
}

#[derive(Debug, Deserialize)]
struct TopicConnection {
    #[serde(default)]
    edges: Vec<TopicEdge>,
}

#[derive(Debug, Deserialize)]
struct TopicEdge {
    node: Option<TopicNode>,
}

#[derive(Debug, Deserialize)]
struct TopicNode {
    topic: Option<Topic>,
}

#[derive(Debug, Deserialize)]
struct Topic {
    name: Option<String>,
}

impl GitHubProvider {
    /// Create a provider, authenticated when a non-empty token is given
    pub fn new(token: Option<&str>, retry: RetryPolicy) -> Result<Self, ProviderError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());

        let builder = Octocrab::builder();
        let builder = match token {
            Some(token) => builder.personal_token(token.to_string()),
            None => builder,
        };
        let client = builder.build().map_err(|e| ProviderError::Client {
            message: e.to_string(),
        })?;

        if token.is_none() {
            debug!("No GitHub token configured, using anonymous API access");
        }

        Ok(Self {
            client,
            retry,
            authenticated: token.is_some(),
        })
    }

    /// GET a REST route and decode the body, retrying transient failures.
    ///
    /// Rate limit headers of a refused request are kept on the error so the
    /// retry waits for the reset.
    async fn get_json<T>(&self, route: &str, params: &[(&str, &str)]) -> Result<T, ProviderError>
    where
        T: DeserializeOwned + Send,
    {
        let uri = with_query(route, params);
        let uri = uri.as_str();

        self.retry
            .run(route, move || async move {
                trace!(route, uri, "GET");
                let response = self
                    .client
                    ._get(uri)
                    .await
                    .map_err(|e| map_error(route, e))?;

                let wait = rate_limit_wait(
                    |name: &str| {
                        response
                            .headers()
                            .get(name)?
                            .to_str()
                            .ok()
                            .map(str::to_owned)
                    },
                    epoch_seconds(),
                );
                let response = octocrab::map_github_error(response)
                    .await
                    .map_err(|e| with_retry_after(map_error(route, e), wait))?;

                let body = self
                    .client
                    .body_to_string(response)
                    .await
                    .map_err(|e| map_error(route, e))?;
                serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
                    route: route.to_string(),
                    message: e.to_string(),
                })
            })
            .await
    }
}

#[async_trait::async_trait]
impl Gateway for GitHubProvider {
    async fn repository(&self, repo: &RepositoryId) -> Result<RepositoryMetadata, ProviderError> {
        self.get_json(&repo_route(repo, ""), &[]).await
    }

    async fn search_total(&self, query: &str) -> Result<u64, ProviderError> {
        let result: SearchTotal = self
            .get_json("/search/issues", &[("q", query), ("per_page", "1")])
            .await?;
        Ok(result.total_count.unwrap_or(0))
    }

    async fn labels(&self, repo: &RepositoryId) -> Result<Vec<String>, ProviderError> {
        let route = repo_route(repo, "/labels");
        let per_page = PER_PAGE.to_string();
        let mut labels = Vec::new();

        for page in 1u32.. {
            let page = page.to_string();
            let batch: Vec<LabelName> = self
                .get_json(&route, &[("per_page", per_page.as_str()), ("page", page.as_str())])
                .await?;
            let fetched = batch.len();
            labels.extend(batch.into_iter().filter_map(|label| label.name));
            if fetched < PER_PAGE {
                break;
            }
        }

        Ok(labels)
    }

    async fn branches(&self, repo: &RepositoryId) -> Result<Vec<BranchRef>, ProviderError> {
        let refs: Vec<GitRef> = self
            .get_json(&repo_route(repo, "/git/matching-refs/heads"), &[])
            .await?;
        Ok(branch_refs(refs))
    }

    async fn file_exists(
        &self,
        repo: &RepositoryId,
        path: &str,
        reference: &str,
    ) -> Result<bool, ProviderError> {
        let route = contents_route(repo, Some(path));
        presence(
            self.get_json::<IgnoredAny>(&route, &[("ref", reference)])
                .await,
        )
    }

    async fn topics(&self, repo: &RepositoryId) -> Result<Vec<String>, ProviderError> {
        if !self.authenticated {
            // GraphQL refuses anonymous callers
            let topics: RestTopics = self.get_json(&repo_route(repo, "/topics"), &[]).await?;
            return Ok(topics.names);
        }

        let payload = serde_json::json!({
            "query": TOPICS_QUERY,
            "variables": { "owner": repo.organization, "name": repo.name },
        });
        let payload = &payload;

        let response: GraphQlResponse<TopicsData> = self
            .retry
            .run("graphql", move || async move {
                self.client
                    .graphql(payload)
                    .await
                    .map_err(|e| map_error("/graphql", e))
            })
            .await?;

        topic_names(response)
    }

    async fn pull_request(
        &self,
        repo: &RepositoryId,
        number: u64,
    ) -> Result<PullRequestInfo, ProviderError> {
        self.get_json(&repo_route(repo, &format!("/pulls/{}", number)), &[])
            .await
    }

    async fn issue(&self, repo: &RepositoryId, number: u64) -> Result<IssueInfo, ProviderError> {
        self.get_json(&repo_route(repo, &format!("/issues/{}", number)), &[])
            .await
    }

    async fn contents(
        &self,
        repo: &RepositoryId,
        path: Option<&str>,
    ) -> Result<Vec<ContentEntry>, ProviderError> {
        let listing: ContentListing = self.get_json(&contents_route(repo, path), &[]).await?;
        Ok(match listing {
            ContentListing::Directory(entries) => entries,
            ContentListing::Single(entry) => vec![entry],
        })
    }
}

fn map_error(route: &str, err: octocrab::Error) -> ProviderError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            api_error(route, source.status_code.as_u16(), &source.message)
        }
        octocrab::Error::Serde { source, .. } => ProviderError::Decode {
            route: route.to_string(),
            message: source.to_string(),
        },
        octocrab::Error::Json { source, .. } => ProviderError::Decode {
            route: route.to_string(),
            message: source.to_string(),
        },
        other => ProviderError::Transport {
            route: route.to_string(),
            message: other.to_string(),
        },
    }
}

fn api_error(route: &str, status: u16, message: &str) -> ProviderError {
    ProviderError::Api {
        route: route.to_string(),
        status,
        message: message.to_string(),
        retry_after: None,
    }
}

/// Attach a rate limit reset hint to a refused request
fn with_retry_after(err: ProviderError, wait: Option<u64>) -> ProviderError {
    match err {
        ProviderError::Api {
            route,
            status: status @ (403 | 429),
            message,
            retry_after: None,
        } => ProviderError::Api {
            route,
            status,
            message,
            retry_after: wait,
        },
        other => other,
    }
}

/// Seconds to wait before the rate limit lifts.
///
/// `retry-after` wins; otherwise an exhausted `x-ratelimit-remaining` waits
/// until the `x-ratelimit-reset` epoch.
fn rate_limit_wait(header: impl Fn(&str) -> Option<String>, now: u64) -> Option<u64> {
    if let Some(seconds) = header("retry-after").and_then(|v| v.trim().parse::<u64>().ok()) {
        return Some(seconds);
    }
    if header("x-ratelimit-remaining")?.trim() != "0" {
        return None;
    }
    let reset: u64 = header("x-ratelimit-reset")?.trim().parse().ok()?;
    Some(reset.saturating_sub(now).max(1))
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// A missing path (404) is an absent file; anything else is a real failure
fn presence<T>(result: Result<T, ProviderError>) -> Result<bool, ProviderError> {
    match result {
        Ok(_) => Ok(true),
        Err(ProviderError::Api { status: 404, .. }) => Ok(false),
        Err(err) => Err(err),
    }
}

fn with_query(route: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return route.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();
    format!("{}?{}", route, query)
}

fn repo_route(repo: &RepositoryId, suffix: &str) -> String {
    format!("/repos/{}/{}{}", repo.organization, repo.name, suffix)
}

fn contents_route(repo: &RepositoryId, path: Option<&str>) -> String {
    match path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(path) => repo_route(repo, &format!("/contents/{}", path)),
        None => repo_route(repo, "/contents"),
    }
}

fn branch_refs(refs: Vec<GitRef>) -> Vec<BranchRef> {
    refs.into_iter()
        .filter_map(|git_ref| {
            let reference = git_ref.reference?;
            let name = reference
                .strip_prefix("refs/heads/")
                .unwrap_or(&reference)
                .to_string();
            Some(BranchRef::new(git_ref.node_id.unwrap_or_default(), name))
        })
        .collect()
}

fn topic_names(response: GraphQlResponse<TopicsData>) -> Result<Vec<String>, ProviderError> {
    let messages = || {
        response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    let Some(data) = &response.data else {
        return Err(ProviderError::GraphQl {
            message: if response.errors.is_empty() {
                "response carried no data".to_string()
            } else {
                messages()
            },
        });
    };

    if !response.errors.is_empty() {
        debug!(errors = %messages(), "GraphQL returned partial data");
    }

    Ok(data
        .repository
        .as_ref()
        .and_then(|repository| repository.repository_topics.as_ref())
        .map(|connection| {
            connection
                .edges
                .iter()
                .filter_map(|edge| edge.node.as_ref()?.topic.as_ref()?.name.clone())
                .collect()
        })
        .unwrap_or_default())
}
