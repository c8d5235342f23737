//! Error handling for commit log construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or querying a commit log.
///
/// Messages from `git2` are captured as strings so the error can be cloned
/// into every caller sharing a memoized log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// No repository could be opened at the requested location.
    #[error("Failed to open git repository at {}: {message}", path.display())]
    RepositoryOpen {
        /// Location that was tried.
        path: PathBuf,
        /// Underlying libgit2 message.
        message: String,
    },

    /// The commit to start the history walk from could not be resolved.
    #[error("Failed to resolve the primary branch tip: {0}")]
    BranchTip(String),

    /// The history walk reported an error.
    #[error("History walk failed: {0}")]
    HistoryWalk(String),

    /// Repository status could not be read.
    #[error("Failed to get repository status: {0}")]
    Status(String),

    /// A commit's diff could not be computed.
    #[error("Failed to diff commit {commit}: {message}")]
    Diff {
        /// Commit hash.
        commit: String,
        /// Underlying libgit2 message.
        message: String,
    },

    /// The commit parser rejected a message.
    #[error("Failed to parse message of commit {commit}: {message}")]
    Parse {
        /// Commit hash.
        commit: String,
        /// Parser message.
        message: String,
    },

    /// A parser pattern did not compile.
    #[error("Invalid commit header pattern: {0}")]
    InvalidPattern(String),

    /// A background task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl LogError {
    pub(crate) fn task(err: impl std::fmt::Display) -> Self {
        Self::Task(err.to_string())
    }
}
