//! Git operations and repository management.

pub mod history;
pub mod repository;

pub use history::{collect_history, spawn_history_walk, RawCommit, WalkEvent};
pub use repository::{GitRepository, PatchPaths, RepositoryPool};
