//! Rendering of ranking results for the command line.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::usage::{ScopeFrequency, ScopeScore, TypeScore};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One entry per line.
    #[default]
    Plain,
    /// YAML document.
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// A row that can be printed as tab-separated plain text.
pub trait PlainRow {
    /// Formats the row without a trailing newline.
    fn plain_row(&self) -> String;
}

impl PlainRow for String {
    fn plain_row(&self) -> String {
        self.clone()
    }
}

impl PlainRow for TypeScore {
    fn plain_row(&self) -> String {
        format!("{}\t{}", self.commit_type, self.score)
    }
}

impl PlainRow for ScopeScore {
    fn plain_row(&self) -> String {
        format!("{}\t{}", self.name, self.score)
    }
}

impl PlainRow for ScopeFrequency {
    fn plain_row(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.name,
            self.occurrence,
            self.with_types.join(",")
        )
    }
}

/// Renders rows in the requested format.
pub fn render<T: Serialize + PlainRow>(rows: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(rows
            .iter()
            .map(|row| row.plain_row() + "\n")
            .collect::<String>()),
        OutputFormat::Yaml => serde_yaml::to_string(rows).context("Failed to serialize to YAML"),
        OutputFormat::Json => serde_json::to_string_pretty(rows)
            .map(|json| json + "\n")
            .context("Failed to serialize to JSON"),
    }
}
