//! # Providers Module
//!
//! This module handles integrations with external services, primarily GitHub.
//!
//! ## GitHub Integration
//!
//! - [`gateway`] - The [`Gateway`] trait the evaluator talks to, plus the
//!   response types it returns
//! - [`github`] - Implementation of the gateway on top of `octocrab`, REST for
//!   most reads and GraphQL for topics
//! - [`retry`] - Exponential backoff for transient failures
//!
//! ## Authentication
//!
//! A personal access token is read from `--ghtoken` or the `GH_TOKEN`
//! environment variable. Without one, calls are anonymous and subject to the
//! lower unauthenticated rate limits.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use modcheck::compliance::RepositoryId;
//! use modcheck::providers::{Gateway, GitHubProvider, RetryPolicy};
//!
//! # async fn run() -> Result<(), modcheck::error::ProviderError> {
//! let provider = GitHubProvider::new(None, RetryPolicy::default())?;
//! let labels = provider
//!     .labels(&RepositoryId::new("PrestaShop", "cheque"))
//!     .await?;
//! println!("{} labels", labels.len());
//! # Ok(())
//! # }
//! ```

#[cfg(test)]
pub mod fake;
pub mod gateway;
pub mod github;
pub mod retry;

pub use gateway::Gateway;
pub use github::GitHubProvider;
pub use retry::RetryPolicy;
