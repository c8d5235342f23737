//! CLI interface for commit-usage.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigManager, UsageConfig};

pub mod report;
pub mod scopes;
pub mod types;

pub use report::ReportCommand;
pub use scopes::ScopesCommand;
pub use types::TypesCommand;

/// commit-usage: ranks conventional commit types and scopes by usage.
#[derive(Parser)]
#[command(name = "commit-usage")]
#[command(
    about = "Ranks conventional commit types and scopes by their usage in git history",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Options shared by every command.
    #[command(flatten)]
    pub options: GlobalOptions,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Orders commit types by usage, favouring types of commits that touched staged files.
    Types(TypesCommand),
    /// Orders scopes for a commit type.
    Scopes(ScopesCommand),
    /// Reports how often each scope was used.
    Report(ReportCommand),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Repository location (defaults to the current directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// Config file to use instead of .commit-usage.yaml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Branch whose history is walked (defaults to master, then main, then HEAD).
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Maximum number of commits diffed at once.
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Regular expression matched against commit headers.
    #[arg(long, global = true, value_name = "REGEX")]
    pub header_pattern: Option<String>,
}

impl GlobalOptions {
    /// Builds the effective configuration: file, then environment, then flags.
    pub fn load_config(&self) -> Result<UsageConfig> {
        let cwd = match &self.cwd {
            Some(path) => path.clone(),
            None => env::current_dir().context("Failed to determine current directory")?,
        };

        let manager = match &self.config {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        };

        let mut config = manager.load(&cwd)?;
        config.apply_env_overrides()?;

        if let Some(path) = &self.cwd {
            config.cwd = Some(path.clone());
        }
        if let Some(branch) = &self.branch {
            config.branch = Some(branch.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(pattern) = &self.header_pattern {
            config.parser.header_pattern = pattern.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        let config = self.options.load_config()?;

        let output = match self.command {
            Commands::Types(cmd) => cmd.execute(&config).await?,
            Commands::Scopes(cmd) => cmd.execute(&config).await?,
            Commands::Report(cmd) => cmd.execute(&config).await?,
        };

        print!("{output}");
        Ok(())
    }
}
