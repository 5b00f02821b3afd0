//! Count-files command - Count files below a repository path

use colored::Colorize;

use super::{parse_repository, Context, CountFilesArgs};
use crate::cli::exit_codes;
use crate::compliance::files::count_files;
use crate::error::ModCheckError;

pub async fn execute(context: &Context, args: CountFilesArgs) -> Result<i32, ModCheckError> {
    let config = context.load_config()?;
    let repo = parse_repository(&config, &args.repository)?;
    let provider = context.provider(&config)?;

    let count = count_files(&provider, &repo, args.path.as_deref()).await?;

    println!(
        "{} {}: {} files",
        repo.to_string().white().bold(),
        args.path.as_deref().unwrap_or("/").cyan(),
        count.to_string().bold()
    );

    Ok(exit_codes::SUCCESS)
}
