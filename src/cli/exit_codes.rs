//! Exit codes for the CLI
//!
//! Standard exit codes used by modcheck for CI/CD integration.
//!
//! # Exit Code Reference
//!
//! | Code | Constant | Meaning | Example |
//! |------|----------|---------|---------|
//! | 0 | `SUCCESS` | Success | Report printed |
//! | 1 | `COMPLIANCE_GAPS` | Gaps found | Missing label with `--fail-on-gaps` |
//! | 2 | `REPOSITORY_FAILURES` | Evaluation failed | GitHub returned 500 for one repository |
//! | 3 | `ERROR` | Runtime error | Invalid config, halted with `--fail-fast` |
//!
//! # Usage
//!
//! ```rust
//! use modcheck::cli::exit_codes;
//!
//! let code = exit_codes::for_report(true, false, true);
//! assert_eq!(code, exit_codes::REPOSITORY_FAILURES);
//! ```

/// Success - report produced.
pub const SUCCESS: i32 = 0;

/// At least one evaluated repository misses a check.
///
/// Only returned when `--fail-on-gaps` is set.
pub const COMPLIANCE_GAPS: i32 = 1;

/// At least one repository could not be evaluated.
pub const REPOSITORY_FAILURES: i32 = 2;

/// Runtime error (configuration, network, file system).
pub const ERROR: i32 = 3;

/// Exit code for a finished report.
///
/// Failures outrank gaps; gaps only count when `fail_on_gaps` is set.
pub fn for_report(has_failures: bool, has_gaps: bool, fail_on_gaps: bool) -> i32 {
    if has_failures {
        REPOSITORY_FAILURES
    } else if has_gaps && fail_on_gaps {
        COMPLIANCE_GAPS
    } else {
        SUCCESS
    }
}
