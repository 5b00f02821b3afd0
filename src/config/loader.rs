//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{GitHubConfig, RuleSet, DEFAULT_REPOSITORIES};
use crate::compliance::RepositoryId;
use crate::error::{ConfigError, ModCheckError};

pub const CONFIG_FILENAME: &str = ".modcheck.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Owner used for repository entries without an `owner/` prefix
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Repository that tracks issues for repositories with issues disabled
    #[serde(default = "default_canonical_repository")]
    pub canonical_repository: String,

    /// Repositories to report on, in row order
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,

    /// Compliance rules
    #[serde(default)]
    pub rules: RuleSet,

    /// GitHub access settings
    #[serde(default)]
    pub github: GitHubConfig,
}

fn default_organization() -> String {
    "PrestaShop".to_string()
}

fn default_canonical_repository() -> String {
    "PrestaShop/PrestaShop".to_string()
}

fn default_repositories() -> Vec<String> {
    DEFAULT_REPOSITORIES.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            canonical_repository: default_canonical_repository(),
            repositories: default_repositories(),
            rules: RuleSet::default(),
            github: GitHubConfig::default(),
        }
    }
}

impl Config {
    /// Load `path` when given, else `.modcheck.toml` when present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ModCheckError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_or_default(),
        }
    }

    /// Load configuration from the working directory or return default
    pub fn load_or_default() -> Result<Self, ModCheckError> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            debug!("No {} found, using default configuration", CONFIG_FILENAME);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ModCheckError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::from)?;
        debug!(
            path = %path.display(),
            repositories = config.repositories.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ModCheckError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }

    /// Configured repositories as identifiers, in order
    pub fn repository_ids(&self) -> Result<Vec<RepositoryId>, ConfigError> {
        if self.repositories.is_empty() {
            return Err(ConfigError::NoRepositories);
        }

        self.repositories
            .iter()
            .map(|entry| RepositoryId::parse(entry, &self.organization))
            .collect()
    }

    /// The canonical issue-tracking repository
    pub fn canonical(&self) -> Result<RepositoryId, ConfigError> {
        RepositoryId::parse(&self.canonical_repository, &self.organization)
    }
}
