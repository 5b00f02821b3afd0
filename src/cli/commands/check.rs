//! Check command - Evaluate repositories and print the compliance report

use colored::Colorize;
use console::Term;
use std::path::Path;
use tracing::{debug, info};

use super::{parse_repository, CheckArgs, Context, OutputFormat};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, ReportRenderer, TerminalOutput};
use crate::compliance::{ComplianceReport, Evaluator, FailurePolicy, ReportBuilder, RepositoryId};
use crate::config::Config;
use crate::error::{ModCheckError, ReportError};
use crate::providers::Gateway;

pub async fn execute(context: &Context, args: CheckArgs) -> Result<i32, ModCheckError> {
    let config = context.load_config()?;
    let repositories = selected_repositories(&config, &args.repo)?;
    let policy = if args.fail_fast {
        FailurePolicy::Halt
    } else {
        FailurePolicy::SkipAndFlag
    };

    let provider = context.provider(&config)?;
    let report = build_report(&provider, &config, &repositories, policy).await?;

    if args.output.is_some() {
        colored::control::set_override(false);
    }
    let renderer: Box<dyn ReportRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(
            TerminalOutput::new()
                .with_hyperlinks(args.output.is_none() && Term::stdout().features().is_attended()),
        ),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    let rendered = renderer.render_report(&report)?;

    match &args.output {
        Some(path) => {
            write_report(path, &rendered)?;
            eprintln!(
                "{} Report written to: {}",
                "Success:".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{}", rendered),
    }

    if args.fail_on_gaps {
        for record in report.records().filter(|record| !record.is_compliant()) {
            debug!(
                repository = %record.repository,
                missing = ?record.missing_checks(),
                "Compliance gaps"
            );
        }
    }

    Ok(exit_codes::for_report(
        report.has_failures(),
        report.has_gaps(),
        args.fail_on_gaps,
    ))
}

/// The `--repo` overrides when given, else the configured list
pub fn selected_repositories(
    config: &Config,
    overrides: &[String],
) -> Result<Vec<RepositoryId>, ModCheckError> {
    if overrides.is_empty() {
        return Ok(config.repository_ids()?);
    }

    overrides
        .iter()
        .map(|entry| parse_repository(config, entry))
        .collect()
}

/// Evaluate `repositories` against the configured rules
pub async fn build_report(
    gateway: &dyn Gateway,
    config: &Config,
    repositories: &[RepositoryId],
    policy: FailurePolicy,
) -> Result<ComplianceReport, ModCheckError> {
    let canonical = config.canonical()?;
    info!(
        canonical = %canonical,
        repositories = repositories.len(),
        "Starting compliance check"
    );

    let evaluator = Evaluator::new(gateway, &config.rules, &canonical);
    let builder = ReportBuilder::new(evaluator)
        .with_policy(policy)
        .with_timeout(config.github.timeout());

    Ok(builder.build(repositories).await?)
}

fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|e| ReportError::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}
