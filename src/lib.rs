//! # commit-usage
//!
//! Ranks conventional commit types and scopes by how often they appear in a
//! repository's history, favouring commits that touched the files currently
//! staged for commit.
//!
//! ## Quick Start
//!
//! ```no_run
//! use commit_usage::{UsageConfig, UsageHelper};
//!
//! # async fn run() -> Result<(), commit_usage::LogError> {
//! let helper = UsageHelper::new(&UsageConfig::at("."))?;
//! let types = helper.sort_types_by_usage(&["feat", "fix", "docs"]).await?;
//! let scopes = helper.sorted_scopes_for_type(&types[0]).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod git;
pub mod parser;
pub mod usage;

pub use crate::cli::Cli;
pub use crate::config::UsageConfig;
pub use crate::error::LogError;
pub use crate::parser::{CommitParser, ConventionalParser, ParseResult, ParserOptions};
pub use crate::usage::{
    scope_report, simple_scope_frequency, sort_types_by_usage, sorted_scopes_for_type,
    CommitLogProvider, EnrichedLog, LogSource, ParsedCommit, ScopeFrequency, UsageHelper,
};

/// The current version of commit-usage.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
