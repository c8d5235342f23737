//! Scopes command: orders scopes for a commit type.

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::UsageConfig;
use crate::data::{render, OutputFormat};
use crate::usage::{score_scopes_for_type, UsageHelper};

/// Scopes command options.
#[derive(Parser)]
pub struct ScopesCommand {
    /// Commit type the scopes are ranked for.
    #[arg(value_name = "TYPE")]
    pub commit_type: String,

    /// Prints each scope's score next to its name.
    #[arg(long)]
    pub scores: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

impl ScopesCommand {
    /// Executes the scopes command and returns the rendered output.
    pub async fn execute(self, config: &UsageConfig) -> Result<String> {
        let helper = UsageHelper::new(config).context("Failed to set up commit history reader")?;

        if self.scores {
            let log = helper.log().await?;
            render(&score_scopes_for_type(&log, &self.commit_type), self.format)
        } else {
            let scopes = helper.sorted_scopes_for_type(&self.commit_type).await?;
            render(&scopes, self.format)
        }
    }
}
