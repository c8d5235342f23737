//! Types command: orders commit types by usage.

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::UsageConfig;
use crate::data::{render, OutputFormat};
use crate::usage::{score_types, UsageHelper};

/// Types command options.
#[derive(Parser)]
pub struct TypesCommand {
    /// Candidate types, space or comma separated (defaults to the configured types).
    #[arg(value_name = "TYPES", value_delimiter = ',')]
    pub types: Vec<String>,

    /// Prints each type's score next to its name.
    #[arg(long)]
    pub scores: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

impl TypesCommand {
    /// Executes the types command and returns the rendered output.
    pub async fn execute(self, config: &UsageConfig) -> Result<String> {
        let types = if self.types.is_empty() {
            config.types.clone()
        } else {
            self.types
        };

        let helper = UsageHelper::new(config).context("Failed to set up commit history reader")?;

        if self.scores {
            let log = helper.log().await?;
            render(&score_types(&log, &types), self.format)
        } else {
            render(&helper.sort_types_by_usage(&types).await?, self.format)
        }
    }
}
