//! Commit message parsing.
//!
//! The ranking code only ever sees a [`ParseResult`]; how a message is split
//! into type and scope is left to a [`CommitParser`] implementation.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod conventional;

pub use conventional::ConventionalParser;

/// Default header pattern: `type(scope): subject`.
pub const DEFAULT_HEADER_PATTERN: &str = r"^(\w*)(?:\(([\w$.\-* ]*)\))?: (.*)$";

/// Parses raw commit messages into structured records.
pub trait CommitParser: Send + Sync {
    /// Parses a single commit message.
    ///
    /// Messages that do not follow the convention yield
    /// [`ParseResult::Unrecognized`] rather than an error.
    fn parse(&self, message: &str) -> Result<ParseResult>;
}

/// Outcome of parsing one commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    /// The message follows the convention.
    Recognized(ConventionalCommit),
    /// The message does not follow the convention.
    Unrecognized,
}

impl ParseResult {
    /// Returns the commit type, if recognized.
    pub fn commit_type(&self) -> Option<&str> {
        match self {
            Self::Recognized(commit) => Some(commit.commit_type.as_str()),
            Self::Unrecognized => None,
        }
    }

    /// Returns the scope, if recognized and present.
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Recognized(commit) => commit.scope.as_deref(),
            Self::Unrecognized => None,
        }
    }
}

/// Structured header of a conventional commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    /// Commit type (feat, fix, docs, ...). Never empty.
    pub commit_type: String,
    /// Optional scope. Never empty when present.
    pub scope: Option<String>,
    /// Header text after the colon.
    pub subject: Option<String>,
}

impl ConventionalCommit {
    /// Creates a record from a type and an optional scope.
    pub fn new(commit_type: impl Into<String>, scope: Option<&str>) -> Self {
        Self {
            commit_type: commit_type.into(),
            scope: scope.filter(|s| !s.is_empty()).map(str::to_string),
            subject: None,
        }
    }
}

/// Options handed through to the commit parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Regular expression matched against the header line.
    pub header_pattern: String,

    /// Field names for the capture groups of `header_pattern`, in order.
    /// Recognized names are `type`, `scope` and `subject`.
    pub header_correspondence: Vec<String>,

    /// Pattern identifying merge headers. When it matches, the next
    /// non-empty line is parsed as the header instead.
    pub merge_pattern: Option<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            header_pattern: DEFAULT_HEADER_PATTERN.to_string(),
            header_correspondence: vec![
                "type".to_string(),
                "scope".to_string(),
                "subject".to_string(),
            ],
            merge_pattern: None,
        }
    }
}
