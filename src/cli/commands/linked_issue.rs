//! Linked-issue command - Show the issue a pull request fixes

use colored::Colorize;
use tracing::debug;

use super::{parse_repository, Context, LinkedIssueArgs};
use crate::cli::exit_codes;
use crate::compliance::linking::find_linked_issue;
use crate::compliance::RepositoryId;
use crate::error::{ModCheckError, ProviderError};
use crate::providers::gateway::{Gateway, IssueInfo};

pub async fn execute(context: &Context, args: LinkedIssueArgs) -> Result<i32, ModCheckError> {
    let config = context.load_config()?;
    let repo = parse_repository(&config, &args.repository)?;
    let canonical = config.canonical()?;
    let provider = context.provider(&config)?;

    match resolve(&provider, &repo, args.number, &canonical).await? {
        Some((issue_repo, issue)) => {
            println!(
                "{} #{} {} [{}]",
                issue_repo.to_string().dimmed(),
                issue.number.to_string().cyan().bold(),
                issue.title.as_deref().unwrap_or(""),
                issue.state.as_deref().unwrap_or("unknown").yellow()
            );
            if let Some(url) = &issue.html_url {
                println!("  {} {}", "└─".dimmed(), url.dimmed());
            }
        }
        None => println!(
            "{} {}#{} does not reference an issue",
            "Info:".blue().bold(),
            repo,
            args.number
        ),
    }

    Ok(exit_codes::SUCCESS)
}

/// Issue referenced by pull request `number` of `repo`, with the repository
/// it was fetched from.
///
/// `#N` references are looked up on `canonical`; full issue URLs on the
/// repository they name.
pub async fn resolve(
    gateway: &dyn Gateway,
    repo: &RepositoryId,
    number: u64,
    canonical: &RepositoryId,
) -> Result<Option<(RepositoryId, IssueInfo)>, ProviderError> {
    let pull_request = gateway.pull_request(repo, number).await?;
    debug!(
        repository = %repo,
        number,
        links = ?pull_request.links,
        "Fetched pull request"
    );

    let Some(link) = pull_request.body.as_deref().and_then(find_linked_issue) else {
        return Ok(None);
    };

    let target = link.repository.unwrap_or_else(|| canonical.clone());
    let issue = gateway.issue(&target, u64::from(link.number)).await?;
    Ok(Some((target, issue)))
}
