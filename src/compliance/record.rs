//! # Compliance Records
//!
//! Data structures produced by the evaluator.
//!
//! - [`Check`] - One named yes/no signal (a label, a file, a topic)
//! - [`ComplianceRecord`] - Every signal derived for one repository
//! - [`CheckFailure`] - A repository that could not be evaluated
//!
//! ## Examples
//!
//! ```rust
//! use modcheck::compliance::Check;
//!
//! let check = Check::new("README.md", true);
//! assert!(check.present);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::repository::RepositoryId;
use crate::error::ProviderError;

/// A named presence check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Label name, file path or topic name
    pub name: String,
    /// Whether the item was found
    pub present: bool,
}

impl Check {
    pub fn new(name: impl Into<String>, present: bool) -> Self {
        Self {
            name: name.into(),
            present,
        }
    }
}

/// Compliance signals for one repository.
///
/// Built once by [`evaluate`](super::evaluator::evaluate) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    /// Repository this record describes
    pub repository: RepositoryId,

    /// Web URL of the repository
    pub url: String,

    pub star_count: u64,

    pub open_pull_request_count: u64,

    /// Issues are tracked on the canonical repository instead of this one
    pub issues_disabled_on_canonical_repo: bool,

    /// Open issues; counted on the canonical repository when
    /// `issues_disabled_on_canonical_repo` is set
    pub issue_count: u64,

    pub has_description: bool,

    /// SPDX identifier, empty when unknown
    pub license: String,

    pub label_checks: Vec<Check>,

    /// First develop-style branch found, in candidate order
    pub develop_branch: Option<String>,

    /// Ref the file checks ran against
    pub file_ref: String,

    pub file_checks: Vec<Check>,

    pub topic_checks: Vec<Check>,
}

impl ComplianceRecord {
    /// Display name of the repository
    pub fn name(&self) -> &str {
        &self.repository.name
    }

    /// Names of every unsatisfied check
    pub fn missing_checks(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if !self.has_description {
            missing.push("description".to_string());
        }
        if self.develop_branch.is_none() {
            missing.push("develop branch".to_string());
        }

        let groups = [
            ("label", &self.label_checks),
            ("file", &self.file_checks),
            ("topic", &self.topic_checks),
        ];
        for (kind, checks) in groups {
            missing.extend(
                checks
                    .iter()
                    .filter(|check| !check.present)
                    .map(|check| format!("{} '{}'", kind, check.name)),
            );
        }

        missing
    }

    /// Whether every check is satisfied
    pub fn is_compliant(&self) -> bool {
        self.missing_checks().is_empty()
    }
}

/// A repository whose evaluation failed on a gateway call
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{repository}: {check} check failed: {message}")]
pub struct CheckFailure {
    /// Repository being evaluated
    pub repository: RepositoryId,
    /// Name of the check whose fetch failed
    pub check: String,
    /// Rendered gateway error
    pub message: String,
}

impl CheckFailure {
    pub fn new(repository: &RepositoryId, check: impl Into<String>, error: &ProviderError) -> Self {
        Self {
            repository: repository.clone(),
            check: check.into(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compliant_record() -> ComplianceRecord {
        ComplianceRecord {
            repository: RepositoryId::new("PrestaShop", "cheque"),
            url: "https://github.com/PrestaShop/cheque".to_string(),
            star_count: 12,
            open_pull_request_count: 3,
            issues_disabled_on_canonical_repo: true,
            issue_count: 4,
            has_description: true,
            license: "AFL-3.0".to_string(),
            label_checks: vec![Check::new("Waiting for QA", true)],
            develop_branch: Some("dev".to_string()),
            file_ref: "refs/heads/master".to_string(),
            file_checks: vec![Check::new("README.md", true)],
            topic_checks: vec![Check::new("prestashop", true)],
        }
    }

    #[test]
    fn test_compliant_record_has_no_missing_checks() {
        let record = compliant_record();
        assert!(record.is_compliant());
        assert!(record.missing_checks().is_empty());
        assert_eq!(record.name(), "cheque");
    }

    #[test]
    fn test_missing_checks_lists_each_gap() {
        let mut record = compliant_record();
        record.has_description = false;
        record.develop_branch = None;
        record.file_checks.push(Check::new("logo.png", false));
        record.topic_checks.push(Check::new("prestashop-module", false));

        assert_eq!(
            record.missing_checks(),
            vec![
                "description".to_string(),
                "develop branch".to_string(),
                "file 'logo.png'".to_string(),
                "topic 'prestashop-module'".to_string(),
            ]
        );
        assert!(!record.is_compliant());
    }

    #[test]
    fn test_check_failure_message() {
        let repo = RepositoryId::new("PrestaShop", "cheque");
        let failure = CheckFailure::new(
            &repo,
            "labels",
            &ProviderError::Timeout { seconds: 30 },
        );
        assert_eq!(
            failure.to_string(),
            "PrestaShop/cheque: labels check failed: Timed out after 30s"
        );
    }
}
