//! Report command: prints the scope frequency report.

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::UsageConfig;
use crate::data::{render, OutputFormat};
use crate::usage::scope_report;

/// Report command options.
#[derive(Parser)]
pub struct ReportCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl ReportCommand {
    /// Executes the report command and returns the rendered output.
    pub async fn execute(self, config: &UsageConfig) -> Result<String> {
        let report = scope_report(config)
            .await
            .context("Failed to build scope report")?;
        render(&report, self.format)
    }
}
