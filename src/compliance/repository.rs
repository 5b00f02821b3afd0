//! Repository identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// An `owner/name` pair naming one GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryId {
    pub organization: String,
    pub name: String,
}

impl RepositoryId {
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
        }
    }

    /// Parse a configuration entry.
    ///
    /// A bare `name` is placed under `default_organization`; an `owner/name`
    /// entry keeps its own owner.
    pub fn parse(entry: &str, default_organization: &str) -> Result<Self, ConfigError> {
        let entry = entry.trim();
        let invalid = || ConfigError::InvalidRepository {
            name: entry.to_string(),
        };

        let (organization, name) = match entry.split_once('/') {
            Some((owner, name)) => (owner, name),
            None => (default_organization, entry),
        };

        if organization.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        if organization.chars().any(char::is_whitespace) || name.chars().any(char::is_whitespace)
        {
            return Err(invalid());
        }

        Ok(Self::new(organization, name))
    }

    /// Full `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.organization, self.name)
    }

    /// Web URL used when the API does not report one
    pub fn default_url(&self) -> String {
        format!("https://github.com/{}/{}", self.organization, self.name)
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.name)
    }
}
