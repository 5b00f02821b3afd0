//! JSON output formatting

use serde::Serialize;

use super::ReportRenderer;
use crate::compliance::{ComplianceReport, ReportEntry};
use crate::error::ModCheckError;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    version: &'static str,
    summary: Summary,
    entries: &'a [ReportEntry],
}

#[derive(Serialize)]
struct Summary {
    repositories: usize,
    compliant: usize,
    failed: usize,
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, report: &ComplianceReport) -> Result<String, ModCheckError> {
        let output = ReportOutput {
            version: env!("CARGO_PKG_VERSION"),
            summary: Summary {
                repositories: report.len(),
                compliant: report.compliant_count(),
                failed: report.failures().count(),
            },
            entries: report.entries(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}
