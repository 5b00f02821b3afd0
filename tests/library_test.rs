//! Library-level tests through the public API

use modcheck::cli::exit_codes;
use modcheck::compliance::linking::linked_issue;
use modcheck::compliance::{evaluate, RawRepositorySnapshot, RepositoryId};
use modcheck::config::{Config, RuleSet};
use modcheck::providers::gateway::{BranchRef, RepositoryMetadata};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn snapshot(name: &str) -> RawRepositorySnapshot {
    let rules = RuleSet::default();
    let mut snapshot = RawRepositorySnapshot::empty(RepositoryId::new("PrestaShop", name));
    snapshot.metadata = RepositoryMetadata {
        description: Some("A module".to_string()),
        has_issues: Some(false),
        open_issues_count: Some(9),
        default_branch: Some("dev".to_string()),
        ..Default::default()
    };
    snapshot.labels = vec!["QA ✔️".to_string(), "Waiting for QA".to_string()];
    snapshot.branches = vec![
        BranchRef::new("B1", "develop"),
        BranchRef::new("B2", "dev"),
    ];
    snapshot.files = rules
        .files
        .iter()
        .map(|path| (path.clone(), path != "logo.png"))
        .collect();
    snapshot.topics = vec!["prestashop".to_string()];
    snapshot.canonical_issue_count = Some(12);
    snapshot
}

// ============================================================================
// Linked issues
// ============================================================================

#[test]
fn test_linked_issue_examples() {
    assert_eq!(linked_issue("Fixes #123"), Some(123));
    assert_eq!(linked_issue("Fixes issue #45"), Some(45));
    assert_eq!(
        linked_issue("Fixes https://github.com/PrestaShop/PrestaShop/issues/9999"),
        Some(9999)
    );
    assert_eq!(linked_issue(""), None);
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_evaluate_derives_every_field() {
    let record = evaluate(&snapshot("cheque"), &RuleSet::default());

    assert_eq!(record.url, "https://github.com/PrestaShop/cheque");
    assert!(record.issues_disabled_on_canonical_repo);
    assert_eq!(record.issue_count, 12);
    assert!(record.has_description);
    assert_eq!(record.license, "");
    assert_eq!(record.develop_branch.as_deref(), Some("dev"));

    let labels: Vec<(&str, bool)> = record
        .label_checks
        .iter()
        .map(|check| (check.name.as_str(), check.present))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("Waiting for QA", true),
            ("QA ✔️", true),
            ("Waiting for author", false),
            ("Waiting for PM", false),
        ]
    );

    let missing_files: Vec<&str> = record
        .file_checks
        .iter()
        .filter(|check| !check.present)
        .map(|check| check.name.as_str())
        .collect();
    assert_eq!(missing_files, vec!["logo.png"]);
    assert!(record.missing_checks().contains(&"topic 'prestashop-module'".to_string()));
}

#[test]
fn test_evaluate_is_idempotent() {
    let rules = RuleSet::default();
    let snapshot = snapshot("bankwire");
    assert_eq!(evaluate(&snapshot, &rules), evaluate(&snapshot, &rules));
}

#[test]
fn test_label_order_does_not_matter() {
    let rules = RuleSet::default();
    let mut reversed = snapshot("cheque");
    reversed.labels.reverse();

    assert_eq!(
        evaluate(&snapshot("cheque"), &rules).label_checks,
        evaluate(&reversed, &rules).label_checks
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.organization, "PrestaShop");
    assert_eq!(config.repositories.len(), 29);
    assert_eq!(config.rules.labels.len(), 4);
    assert_eq!(config.rules.files.len(), 9);
    assert_eq!(config.rules.topics, vec!["prestashop", "prestashop-module"]);
    assert_eq!(config.rules.fallback_branch, "master");
}

#[test]
fn test_partial_config_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("modcheck.toml");
    fs::write(
        &path,
        "repositories = [\"cheque\", \"friends/blockwishlist\"]\n\n[rules]\ntopics = [\"payment\"]\n",
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    let ids = config.repository_ids().unwrap();
    assert_eq!(
        ids,
        vec![
            RepositoryId::new("PrestaShop", "cheque"),
            RepositoryId::new("friends", "blockwishlist"),
        ]
    );
    assert_eq!(config.rules.topics, vec!["payment"]);
    assert_eq!(config.rules.labels.len(), 4);
    assert_eq!(config.github.max_retries, 3);
}

#[test]
fn test_exit_code_mapping() {
    assert_eq!(exit_codes::for_report(false, true, false), exit_codes::SUCCESS);
    assert_eq!(
        exit_codes::for_report(false, true, true),
        exit_codes::COMPLIANCE_GAPS
    );
    assert_eq!(
        exit_codes::for_report(true, false, false),
        exit_codes::REPOSITORY_FAILURES
    );
}
