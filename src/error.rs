//! Error types for modcheck
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.

use std::time::Duration;
use thiserror::Error;

use crate::compliance::CheckFailure;

/// Main error type for modcheck
#[derive(Error, Debug)]
pub enum ModCheckError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// GitHub provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A repository could not be evaluated and the report was halted
    #[error("Evaluation halted: {0}")]
    Evaluation(#[from] CheckFailure),

    /// Report rendering or writing errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the configuration file
    #[error("Failed to write config file '{path}': {source}")]
    FileWrite {
        path: String,
        source: std::io::Error,
    },

    /// The configuration file already exists
    #[error("Configuration file '{path}' already exists. Use --force to overwrite.")]
    AlreadyExists { path: String },

    /// TOML parsing error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to serialize config: {message}")]
    Serialize { message: String },

    /// A repository entry is not `name` or `owner/name`
    #[error("Invalid repository '{name}': expected 'name' or 'owner/name'")]
    InvalidRepository { name: String },

    /// No repositories configured
    #[error("No repositories configured")]
    NoRepositories,
}

/// Errors raised by the GitHub gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The GitHub client could not be constructed
    #[error("Failed to build GitHub client: {message}")]
    Client { message: String },

    /// GitHub answered with an error status
    #[error("GitHub returned HTTP {status} for {route}: {message}")]
    Api {
        route: String,
        status: u16,
        message: String,
        /// Seconds until the rate limit resets, from `Retry-After` or
        /// `x-ratelimit-reset`
        retry_after: Option<u64>,
    },

    /// The request never produced an HTTP answer
    #[error("Request to {route} failed: {message}")]
    Transport { route: String, message: String },

    /// The response body did not decode
    #[error("Unexpected response from {route}: {message}")]
    Decode { route: String, message: String },

    /// The GraphQL endpoint reported errors
    #[error("GraphQL query failed: {message}")]
    GraphQl { message: String },

    /// The evaluation did not finish in time
    #[error("Timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl ProviderError {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Transport { .. } => true,
            ProviderError::Api {
                status,
                message,
                retry_after,
                ..
            } => {
                retry_after.is_some()
                    || *status == 429
                    || *status >= 500
                    || (*status == 403 && message.to_lowercase().contains("rate limit"))
            }
            ProviderError::Client { .. }
            | ProviderError::Decode { .. }
            | ProviderError::GraphQl { .. }
            | ProviderError::Timeout { .. } => false,
        }
    }

    /// Wait requested by the API before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ProviderError::Api {
                retry_after: Some(seconds),
                ..
            } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}

/// Errors that occur while producing report output
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to write the report file
    #[error("Failed to write report '{path}': {source}")]
    FileWrite {
        path: String,
        source: std::io::Error,
    },

    /// Failed to render the man page
    #[error("Failed to render man page: {source}")]
    ManPage { source: std::io::Error },
}

impl From<toml::ser::Error> for ModCheckError {
    fn from(err: toml::ser::Error) -> Self {
        ModCheckError::Config(ConfigError::Serialize {
            message: err.to_string(),
        })
    }
}
