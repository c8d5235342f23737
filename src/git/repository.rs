//! Git repository operations

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use git2::{Commit, Oid, Repository, Status, StatusOptions};
use tracing::debug;

use crate::error::LogError;

/// Branches tried, in order, when no branch is configured.
const DEFAULT_BRANCHES: &[&str] = &["master", "main"];

/// Status flags that mark a file as staged.
const STAGED: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

/// Handle on one opened git repository.
pub struct GitRepository {
    repo: Repository,
}

/// Old and new path of one patch in a commit diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPaths {
    /// Path before the change, if any.
    pub old_path: Option<String>,
    /// Path after the change, if any.
    pub new_path: Option<String>,
}

impl PatchPaths {
    /// Returns true when either side of the patch is in `paths`.
    pub fn touches_any(&self, paths: &HashSet<String>) -> bool {
        [&self.old_path, &self.new_path]
            .into_iter()
            .flatten()
            .any(|path| paths.contains(path))
    }
}

impl GitRepository {
    /// Opens the repository at `path`.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|e| LogError::RepositoryOpen {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        Ok(Self { repo })
    }

    /// Returns the underlying `git2::Repository`.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Resolves the commit the history walk starts from.
    ///
    /// Uses `branch` when given, otherwise the first of `master` and `main`
    /// that exists, otherwise HEAD.
    pub fn branch_tip(&self, branch: Option<&str>) -> Result<Oid, LogError> {
        if let Some(name) = branch {
            return self.local_branch_tip(name)?.ok_or_else(|| {
                LogError::BranchTip(format!("Branch '{name}' does not exist"))
            });
        }

        for name in DEFAULT_BRANCHES {
            if let Some(oid) = self.local_branch_tip(name)? {
                debug!(branch = *name, %oid, "Resolved primary branch tip");
                return Ok(oid);
            }
        }

        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| LogError::BranchTip(e.message().to_string()))?;
        debug!(oid = %head.id(), "No master/main branch, walking from HEAD");
        Ok(head.id())
    }

    fn local_branch_tip(&self, name: &str) -> Result<Option<Oid>, LogError> {
        match self.repo.find_branch(name, git2::BranchType::Local) {
            Ok(branch) => branch
                .get()
                .peel_to_commit()
                .map(|commit| Some(commit.id()))
                .map_err(|e| LogError::BranchTip(e.message().to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(LogError::BranchTip(e.message().to_string())),
        }
    }

    /// Returns the paths of all files staged in the index.
    pub fn staged_files(&self) -> Result<HashSet<String>, LogError> {
        let mut options = StatusOptions::new();
        options.include_untracked(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .map_err(|e| LogError::Status(e.message().to_string()))?;

        let mut staged = HashSet::new();
        for entry in statuses.iter() {
            if !entry.status().intersects(STAGED) {
                continue;
            }

            // For staged renames the index side carries the new name.
            let path = entry
                .head_to_index()
                .and_then(|delta| delta.new_file().path().map(path_to_string))
                .or_else(|| entry.path().map(str::to_string));

            if let Some(path) = path {
                staged.insert(path);
            }
        }

        Ok(staged)
    }

    /// Lists the patches a commit introduced.
    ///
    /// Diffs against every parent, so merges report one group per parent.
    /// Root commits diff against the empty tree.
    pub fn commit_patches(&self, oid: Oid) -> Result<Vec<PatchPaths>, LogError> {
        let diff_error = |e: git2::Error| LogError::Diff {
            commit: oid.to_string(),
            message: e.message().to_string(),
        };

        let commit = self.repo.find_commit(oid).map_err(diff_error)?;
        let commit_tree = commit.tree().map_err(diff_error)?;

        let parent_trees = commit
            .parents()
            .map(|parent: Commit<'_>| parent.tree())
            .collect::<Result<Vec<_>, _>>()
            .map_err(diff_error)?;

        let mut patches = Vec::new();
        let mut push_deltas = |diff: git2::Diff<'_>| {
            patches.extend(diff.deltas().map(|delta| PatchPaths {
                old_path: delta.old_file().path().map(path_to_string),
                new_path: delta.new_file().path().map(path_to_string),
            }));
        };

        if parent_trees.is_empty() {
            let diff = self
                .repo
                .diff_tree_to_tree(None, Some(&commit_tree), None)
                .map_err(diff_error)?;
            push_deltas(diff);
        } else {
            for parent_tree in &parent_trees {
                let diff = self
                    .repo
                    .diff_tree_to_tree(Some(parent_tree), Some(&commit_tree), None)
                    .map_err(diff_error)?;
                push_deltas(diff);
            }
        }

        Ok(patches)
    }
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Pool of repository handles for blocking diff work.
///
/// `git2::Repository` is `Send` but not `Sync`, so each blocking task checks
/// out its own handle and returns it when done.
pub struct RepositoryPool {
    path: PathBuf,
    idle: Mutex<Vec<GitRepository>>,
}

impl RepositoryPool {
    /// Creates a pool seeded with an already opened repository.
    pub fn new(path: PathBuf, seed: GitRepository) -> Self {
        Self {
            path,
            idle: Mutex::new(vec![seed]),
        }
    }

    /// Runs `f` with a pooled repository handle.
    pub fn with_repository<T>(
        &self,
        f: impl FnOnce(&GitRepository) -> Result<T, LogError>,
    ) -> Result<T, LogError> {
        let pooled = self.idle.lock().ok().and_then(|mut idle| idle.pop());
        let repo = match pooled {
            Some(repo) => repo,
            None => GitRepository::open_at(&self.path)?,
        };

        let result = f(&repo);

        if let Ok(mut idle) = self.idle.lock() {
            idle.push(repo);
        }

        result
    }
}
