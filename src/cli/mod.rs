//! # CLI Module
//!
//! This module defines the command-line interface for modcheck using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `init` | Write the default configuration file |
//! | `check` | Evaluate the configured repositories and print the report |
//! | `linked-issue` | Show the issue a pull request fixes |
//! | `count-files` | Count files below a repository path |
//!
//! ## Submodules
//!
//! - [`commands`] - Command implementations
//! - [`exit_codes`] - Standardized exit codes
//! - [`output`] - Report output formatters (Terminal, JSON)
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `--ghtoken <TOKEN>` - GitHub token (also read from `GH_TOKEN`)
//!
//! ## Examples
//!
//! ```bash
//! # Write .modcheck.toml
//! modcheck init
//!
//! # Print the compliance table
//! GH_TOKEN=... modcheck check
//!
//! # JSON report for two repositories, non-zero exit on gaps
//! modcheck check --repo cheque --repo bankwire --format json --fail-on-gaps
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{CheckArgs, CountFilesArgs, GenerateManArgs, InitArgs, LinkedIssueArgs};

/// modcheck - GitHub module compliance report
#[derive(Parser, Debug)]
#[command(name = "modcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub token; anonymous requests when absent
    #[arg(
        long,
        env = "GH_TOKEN",
        hide_env_values = true,
        global = true,
        value_name = "TOKEN"
    )]
    pub ghtoken: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default configuration file
    Init(InitArgs),

    /// Evaluate repositories and print the compliance report
    Check(CheckArgs),

    /// Show the issue a pull request fixes
    LinkedIssue(LinkedIssueArgs),

    /// Count files below a repository path
    CountFiles(CountFilesArgs),

    /// Generate man page (hidden, for packaging)
    #[command(hide = true)]
    GenerateMan(GenerateManArgs),
}

impl Cli {
    /// Execute the parsed command
    pub async fn run(self) -> Result<i32, crate::ModCheckError> {
        let Cli {
            config,
            ghtoken,
            command,
            ..
        } = self;
        let context = commands::Context {
            config,
            token: ghtoken,
        };

        match command {
            Commands::Init(args) => commands::init::execute(&context, args).await,
            Commands::Check(args) => commands::check::execute(&context, args).await,
            Commands::LinkedIssue(args) => commands::linked_issue::execute(&context, args).await,
            Commands::CountFiles(args) => commands::count_files::execute(&context, args).await,
            Commands::GenerateMan(args) => commands::generate_man::execute(args).await,
        }
    }
}
