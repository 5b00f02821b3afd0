//! Generate man page command

use clap::CommandFactory;
use std::fs;
use std::path::{Path, PathBuf};

use super::GenerateManArgs;
use crate::cli::{exit_codes, Cli};
use crate::error::{ModCheckError, ReportError};

/// Execute the generate-man command
pub async fn execute(args: GenerateManArgs) -> Result<i32, ModCheckError> {
    let output_path = write_man_page(&args.output)?;
    println!("Man page generated: {}", output_path.display());

    Ok(exit_codes::SUCCESS)
}

fn write_man_page(dir: &Path) -> Result<PathBuf, ReportError> {
    let man = clap_mangen::Man::new(Cli::command());
    let output_path = dir.join("modcheck.1");

    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer)
        .map_err(|source| ReportError::ManPage { source })?;

    fs::write(&output_path, buffer).map_err(|e| ReportError::FileWrite {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(output_path)
}
