//! Init command - Write the default configuration file

use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Context, InitArgs};
use crate::cli::exit_codes;
use crate::config::{Config, CONFIG_FILENAME};
use crate::error::{ConfigError, ModCheckError};

pub async fn execute(context: &Context, args: InitArgs) -> Result<i32, ModCheckError> {
    let config_path = context
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    write_default(&config_path, args.force)?;

    println!(
        "{} Created {} with {} repositories",
        "Success:".green().bold(),
        config_path.display().to_string().cyan(),
        Config::default().repositories.len()
    );

    println!("\nNext steps:");
    println!("  1. Review and customize {}", config_path.display().to_string().cyan());
    println!("  2. Export {} for authenticated requests", "GH_TOKEN".cyan());
    println!("  3. Run {} to print the report", "modcheck check".cyan());

    Ok(exit_codes::SUCCESS)
}

/// Write the default configuration to `path`, refusing to overwrite unless `force`
pub fn write_default(path: &Path, force: bool) -> Result<(), ModCheckError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = Config::default().to_toml()?;
    fs::write(path, content).map_err(|e| ConfigError::FileWrite {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
