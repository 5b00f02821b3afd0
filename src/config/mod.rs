//! Configuration module

pub mod loader;

pub use loader::{Config, CONFIG_FILENAME};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::providers::RetryPolicy;

/// Workflow labels every repository should define
pub const DEFAULT_LABELS: &[&str] = &[
    "Waiting for QA",
    "QA ✔️",
    "Waiting for author",
    "Waiting for PM",
];

/// Files that should exist at the head of the default branch
pub const DEFAULT_FILES: &[&str] = &[
    "README.md",
    "CONTRIBUTORS.md",
    "CHANGELOG.txt",
    "composer.json",
    "composer.lock",
    "config.xml",
    "logo.png",
    ".github/release-drafter.yml",
    ".github/PULL_REQUEST_TEMPLATE.md",
];

/// Topics every repository should carry
pub const DEFAULT_TOPICS: &[&str] = &["prestashop", "prestashop-module"];

/// Develop-style branch names, most preferred first
pub const DEFAULT_DEVELOP_BRANCHES: &[&str] = &["dev", "develop"];

/// Module repositories reported when no list is configured
pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "bankwire",
    "blockreassurance",
    "cheque",
    "cronjobs",
    "dateofdelivery",
    "gadwords",
    "gamification",
    "productcomments",
    "ps_contactinfo",
    "ps_crossselling",
    "ps_customeraccountlinks",
    "ps_dataprivacy",
    "ps_emailalerts",
    "ps_emailsmanager",
    "ps_emailsubscription",
    "ps_facetedsearch",
    "ps_googleanalytics",
    "ps_imageslider",
    "ps_linklist",
    "ps_mainmenu",
    "ps_mbo",
    "ps_newproducts",
    "ps_searchbar",
    "ps_shoppingcart",
    "ps_themecusto",
    "ps_wirepayment",
    "pscleaner",
    "psgdpr",
    "watermark",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Rules a repository is checked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Labels checked by exact name
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Paths checked for existence at the default branch
    #[serde(default = "default_files")]
    pub files: Vec<String>,

    /// Topics checked by exact name
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,

    /// Develop-style branch candidates, in priority order
    #[serde(default = "default_develop_branches")]
    pub develop_branches: Vec<String>,

    /// Branch used for file checks when the repository reports no default branch
    #[serde(default = "default_fallback_branch")]
    pub fallback_branch: String,
}

fn default_labels() -> Vec<String> {
    to_strings(DEFAULT_LABELS)
}

fn default_files() -> Vec<String> {
    to_strings(DEFAULT_FILES)
}

fn default_topics() -> Vec<String> {
    to_strings(DEFAULT_TOPICS)
}

fn default_develop_branches() -> Vec<String> {
    to_strings(DEFAULT_DEVELOP_BRANCHES)
}

fn default_fallback_branch() -> String {
    "master".to_string()
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            labels: default_labels(),
            files: default_files(),
            topics: default_topics(),
            develop_branches: default_develop_branches(),
            fallback_branch: default_fallback_branch(),
        }
    }
}

/// GitHub access configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Retries for a failing API call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound for the retry delay, in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Time budget for evaluating one repository, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GitHubConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms.max(self.initial_backoff_ms)),
            max_rate_limit_wait: self.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_set() {
        let rules = RuleSet::default();
        assert_eq!(rules.labels.len(), 4);
        assert_eq!(rules.files.len(), 9);
        assert_eq!(rules.topics, vec!["prestashop", "prestashop-module"]);
        assert_eq!(rules.develop_branches, vec!["dev", "develop"]);
        assert_eq!(rules.fallback_branch, "master");
    }

    #[test]
    fn test_default_repositories() {
        assert_eq!(DEFAULT_REPOSITORIES.len(), 29);
        assert_eq!(DEFAULT_REPOSITORIES.first(), Some(&"bankwire"));
        assert_eq!(DEFAULT_REPOSITORIES.last(), Some(&"watermark"));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = GitHubConfig {
            max_retries: 5,
            initial_backoff_ms: 200,
            max_backoff_ms: 100,
            timeout_secs: 0,
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_backoff, Duration::from_millis(200));
        // max never drops below the initial delay
        assert_eq!(policy.max_backoff, Duration::from_millis(200));
        assert_eq!(config.timeout(), Duration::from_secs(1));
        // a rate limit wait never outlasts the repository timeout
        assert_eq!(policy.max_rate_limit_wait, config.timeout());
    }
}
