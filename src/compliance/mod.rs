//! # Compliance Module
//!
//! Turns GitHub API responses into yes/no compliance signals.
//!
//! - [`repository`] - Repository identifiers
//! - [`evaluator`] - Snapshot fetching and the pure [`evaluate`] function
//! - [`record`] - [`ComplianceRecord`] and [`CheckFailure`]
//! - [`report`] - Ordered evaluation of many repositories
//! - [`linking`] - Linked issue extraction from pull request bodies
//! - [`files`] - Recursive file counting
//!
//! ## Examples
//!
//! ```rust
//! use modcheck::compliance::{evaluate, RawRepositorySnapshot, RepositoryId};
//! use modcheck::config::RuleSet;
//!
//! let snapshot = RawRepositorySnapshot::empty(RepositoryId::new("PrestaShop", "cheque"));
//! let record = evaluate(&snapshot, &RuleSet::default());
//!
//! // nothing reported means nothing satisfied
//! assert!(!record.is_compliant());
//! ```

pub mod evaluator;
pub mod files;
pub mod linking;
pub mod record;
pub mod report;
pub mod repository;

pub use evaluator::{evaluate, Evaluator, RawRepositorySnapshot};
pub use record::{Check, CheckFailure, ComplianceRecord};
pub use report::{ComplianceReport, FailurePolicy, Outcome, ReportBuilder, ReportEntry};
pub use repository::RepositoryId;
