//! Ranking of commit types and scopes by historical usage.
//!
//! A [`CommitLogProvider`] turns repository history into an [`EnrichedLog`]:
//! one [`ParsedCommit`] per commit, flagged when the commit touched a file
//! that is currently staged. The rankers in [`types`] and [`scopes`] are pure
//! folds over that log. [`UsageHelper`] ties both together and loads the log
//! at most once.

pub mod helper;
pub mod provider;
pub mod scopes;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use helper::UsageHelper;
pub use provider::{CommitLogProvider, LogSource};
pub use scopes::{
    score_scopes_for_type, simple_scope_frequency, sorted_scopes_for_type, ScopeFrequency,
    ScopeScore,
};
pub use types::{score_types, sort_types_by_usage, TypeScore};

use crate::config::UsageConfig;
use crate::error::LogError;
use crate::parser::{ConventionalCommit, ParseResult};

/// Score every counted commit contributes.
pub const BASE_WEIGHT: u64 = 1;

/// Extra score when ranking scopes and the commit's type matches the query.
pub const TYPE_AFFINITY_BONUS: u64 = 50;

/// Extra score for commits that touched a staged file. Outweighs any
/// realistic amount of plain usage.
pub const RELEVANCE_BONUS: u64 = 500;

/// Parsed commits in history order, newest first.
pub type EnrichedLog = Vec<ParsedCommit>;

/// A commit reduced to what the rankers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    id: String,
    parsed: ParseResult,
    relevant_to_staged_files: bool,
}

impl ParsedCommit {
    /// Creates a commit whose message did not follow the convention.
    /// Such commits are never relevant.
    pub fn unrecognized(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parsed: ParseResult::Unrecognized,
            relevant_to_staged_files: false,
        }
    }

    /// Creates a conventional commit with its relevance flag.
    pub fn recognized(id: impl Into<String>, commit: ConventionalCommit, relevant: bool) -> Self {
        Self {
            id: id.into(),
            parsed: ParseResult::Recognized(commit),
            relevant_to_staged_files: relevant,
        }
    }

    /// Creates a commit from a parse result without relevance information.
    pub fn from_parse(id: impl Into<String>, parsed: ParseResult) -> Self {
        Self {
            id: id.into(),
            parsed,
            relevant_to_staged_files: false,
        }
    }

    /// Commit hash.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parse result of the commit message.
    pub fn parsed(&self) -> &ParseResult {
        &self.parsed
    }

    /// Commit type, if the message was recognized.
    pub fn commit_type(&self) -> Option<&str> {
        self.parsed.commit_type()
    }

    /// Commit scope, if present.
    pub fn scope(&self) -> Option<&str> {
        self.parsed.scope()
    }

    /// Whether the commit touched a currently staged file.
    pub fn is_relevant_to_staged_files(&self) -> bool {
        self.relevant_to_staged_files
    }

    fn relevance_weight(&self) -> u64 {
        if self.relevant_to_staged_files {
            RELEVANCE_BONUS
        } else {
            0
        }
    }
}

/// Reports how often each scope was used, without relevance weighting.
///
/// Walks and parses history only; no status or diff work is done.
pub async fn scope_report(config: &UsageConfig) -> Result<Vec<ScopeFrequency>, LogError> {
    let provider = CommitLogProvider::new(config)?;
    let log = provider.load_parsed().await?;
    Ok(simple_scope_frequency(&log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_commits_are_never_relevant() {
        let commit = ParsedCommit::unrecognized("abc");
        assert!(!commit.is_relevant_to_staged_files());
        assert_eq!(commit.commit_type(), None);
        assert_eq!(commit.scope(), None);
    }

    #[test]
    fn recognized_commit_accessors() {
        let commit =
            ParsedCommit::recognized("abc", ConventionalCommit::new("feat", Some("ui")), true);
        assert_eq!(commit.id(), "abc");
        assert_eq!(commit.commit_type(), Some("feat"));
        assert_eq!(commit.scope(), Some("ui"));
        assert!(commit.is_relevant_to_staged_files());
        assert_eq!(commit.relevance_weight(), RELEVANCE_BONUS);
    }

    #[test]
    fn from_parse_has_no_relevance() {
        let parsed = ParseResult::Recognized(ConventionalCommit::new("fix", None));
        let commit = ParsedCommit::from_parse("abc", parsed);
        assert!(!commit.is_relevant_to_staged_files());
        assert_eq!(commit.relevance_weight(), 0);
    }
}
