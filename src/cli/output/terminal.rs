//! Terminal output formatting with colors

use colored::Colorize;
use console::measure_text_width;
use lazy_static::lazy_static;
use regex::Regex;

use super::ReportRenderer;
use crate::compliance::{Check, ComplianceRecord, ComplianceReport, Outcome};
use crate::error::ModCheckError;

const HEADERS: [&str; 11] = [
    "Title",
    "# Stars",
    "# PR",
    "PS Issues",
    "# Issues",
    "Description",
    "License",
    "Labels",
    "Branch dev",
    "Files",
    "GH Topics",
];

lazy_static! {
    /// OSC 8 hyperlink open/close sequences, invisible on screen
    static ref HYPERLINK: Regex = Regex::new(r"\x1b\]8;[^\x07\x1b]*(?:\x07|\x1b\\)").unwrap();
}

/// One table cell, possibly spanning several lines
type Cell = Vec<String>;

pub struct TerminalOutput {
    hyperlinks: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { hyperlinks: false }
    }

    /// Link each repository name to its GitHub page
    pub fn with_hyperlinks(mut self, enabled: bool) -> Self {
        self.hyperlinks = enabled;
        self
    }

    fn format_header(&self) -> String {
        format!(
            "\n{} v{}\n\n",
            "modcheck".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        )
    }

    fn record_row(&self, record: &ComplianceRecord) -> Vec<Cell> {
        let license = if record.license.is_empty() {
            "-".dimmed().to_string()
        } else {
            record.license.clone()
        };
        let develop_branch = match &record.develop_branch {
            Some(name) => format!("{} {}", mark(true), name),
            None => mark(false),
        };

        let title = record.name().bold().to_string();
        let title = if self.hyperlinks {
            hyperlink(&record.url, &title)
        } else {
            title
        };

        vec![
            vec![title],
            vec![record.star_count.to_string()],
            vec![record.open_pull_request_count.to_string()],
            vec![mark(record.issues_disabled_on_canonical_repo)],
            vec![record.issue_count.to_string()],
            vec![mark(record.has_description)],
            vec![license],
            checklist(&record.label_checks),
            vec![develop_branch],
            checklist(&record.file_checks),
            checklist(&record.topic_checks),
        ]
    }

    fn error_row(&self, name: &str) -> Vec<Cell> {
        let mut row = vec![vec![name.bold().to_string()]];
        row.extend((1..HEADERS.len()).map(|_| vec!["error".red().to_string()]));
        row
    }

    fn format_table(&self, report: &ComplianceReport) -> String {
        let header: Vec<Cell> = HEADERS
            .iter()
            .map(|title| vec![title.bold().to_string()])
            .collect();
        let rows: Vec<Vec<Cell>> = report
            .entries()
            .iter()
            .map(|entry| match &entry.outcome {
                Outcome::Evaluated(record) => self.record_row(record),
                Outcome::Failed(_) => self.error_row(&entry.repository.name),
            })
            .collect();

        let widths = column_widths(std::iter::once(&header).chain(rows.iter()));

        let mut output = String::new();
        output.push_str(&border(&widths, '┌', '┬', '┐'));
        output.push_str(&format_row(&header, &widths));
        for row in &rows {
            output.push_str(&border(&widths, '├', '┼', '┤'));
            output.push_str(&format_row(row, &widths));
        }
        output.push_str(&border(&widths, '└', '┴', '┘'));
        output
    }

    fn format_failures(&self, report: &ComplianceReport) -> String {
        let mut output = String::new();
        if !report.has_failures() {
            return output;
        }

        output.push_str(&format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  FAILURES".bold()
        ));
        for failure in report.failures() {
            output.push_str(&format!(
                "  {} {} [{}] {}\n",
                "•".dimmed(),
                failure.repository.to_string().white().bold(),
                failure.check.cyan(),
                failure.message
            ));
        }

        output
    }

    fn format_summary(&self, report: &ComplianceReport) -> String {
        let failed = report.failures().count();
        let compliant = report.compliant_count();
        let with_gaps = report.len() - failed - compliant;

        format!(
            "\nRepositories: {} │ Compliant: {} │ With gaps: {} │ Failed: {}\n",
            report.len().to_string().bold(),
            compliant.to_string().green().bold(),
            with_gaps.to_string().yellow().bold(),
            failed.to_string().red().bold()
        )
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, report: &ComplianceReport) -> Result<String, ModCheckError> {
        let mut output = String::new();

        output.push_str(&self.format_header());
        output.push_str(&self.format_table(report));
        output.push_str(&self.format_failures(report));
        output.push_str(&self.format_summary(report));

        Ok(output)
    }
}

fn mark(present: bool) -> String {
    if present {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, text)
}

/// Check name as printed in a cell.
///
/// The emoji variation selector makes terminals draw `✔️` two columns wide
/// while it measures as one, so it is dropped.
fn display_name(name: &str) -> String {
    name.replace('\u{fe0f}', "")
}

fn checklist(checks: &[Check]) -> Cell {
    if checks.is_empty() {
        return vec![String::new()];
    }
    checks
        .iter()
        .map(|check| format!("{} {}", mark(check.present), display_name(&check.name)))
        .collect()
}

/// Columns a line occupies on screen
fn visible_width(line: &str) -> usize {
    measure_text_width(&HYPERLINK.replace_all(line, ""))
}

fn column_widths<'a>(rows: impl Iterator<Item = &'a Vec<Cell>>) -> Vec<usize> {
    let mut widths = vec![0; HEADERS.len()];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            let longest = cell.iter().map(|line| visible_width(line)).max();
            *width = (*width).max(longest.unwrap_or(0));
        }
    }
    widths
}

fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|width| "─".repeat(width + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&middle.to_string()), right)
}

fn format_row(row: &[Cell], widths: &[usize]) -> String {
    let height = row.iter().map(Vec::len).max().unwrap_or(1);
    let mut output = String::new();

    for line in 0..height {
        output.push('│');
        for (cell, width) in row.iter().zip(widths) {
            let text = cell.get(line).map(String::as_str).unwrap_or("");
            output.push(' ');
            output.push_str(text);
            output.push_str(&" ".repeat(width.saturating_sub(visible_width(text))));
            output.push_str(" │");
        }
        output.push('\n');
    }

    output
}
