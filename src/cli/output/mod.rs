//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::compliance::ComplianceReport;
use crate::error::ModCheckError;

/// Trait for rendering report output
pub trait ReportRenderer {
    fn render_report(&self, report: &ComplianceReport) -> Result<String, ModCheckError>;
}
