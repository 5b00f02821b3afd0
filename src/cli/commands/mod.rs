//! CLI commands module

pub mod check;
pub mod count_files;
pub mod generate_man;
pub mod init;
pub mod linked_issue;

use clap::Args;
use std::path::PathBuf;

use crate::compliance::RepositoryId;
use crate::config::Config;
use crate::error::ModCheckError;
use crate::providers::GitHubProvider;

/// Global options shared by every command
#[derive(Debug, Default, Clone)]
pub struct Context {
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// GitHub token
    pub token: Option<String>,
}

impl Context {
    pub fn load_config(&self) -> Result<Config, ModCheckError> {
        Config::load(self.config.as_deref())
    }

    pub fn provider(&self, config: &Config) -> Result<GitHubProvider, ModCheckError> {
        let provider = GitHubProvider::new(self.token.as_deref(), config.github.retry_policy())?;
        Ok(provider)
    }
}

/// Parse a command-line repository argument against the configured organization
pub(crate) fn parse_repository(
    config: &Config,
    entry: &str,
) -> Result<RepositoryId, ModCheckError> {
    Ok(RepositoryId::parse(entry, &config.organization)?)
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Check these repositories instead of the configured list
    #[arg(long, value_name = "NAME")]
    pub repo: Vec<String>,

    /// Stop at the first repository that cannot be evaluated
    #[arg(long)]
    pub fail_fast: bool,

    /// Exit with code 1 when a repository misses a check
    #[arg(long)]
    pub fail_on_gaps: bool,
}

/// Arguments for the linked-issue command
#[derive(Args, Debug)]
pub struct LinkedIssueArgs {
    /// Repository holding the pull request (name or owner/name)
    pub repository: String,

    /// Pull request number
    pub number: u64,
}

/// Arguments for the count-files command
#[derive(Args, Debug)]
pub struct CountFilesArgs {
    /// Repository to inspect (name or owner/name)
    pub repository: String,

    /// Directory to count (defaults to the repository root)
    pub path: Option<String>,
}

/// Arguments for the generate-man command
#[derive(Args, Debug)]
pub struct GenerateManArgs {
    /// Output directory for the man page
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

/// Output format for the check command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
