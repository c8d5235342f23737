//! Builds the enriched commit log from a repository.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::config::UsageConfig;
use crate::error::LogError;
use crate::git::{collect_history, spawn_history_walk, GitRepository, RawCommit, RepositoryPool};
use crate::parser::{CommitParser, ConventionalParser, ParseResult};
use crate::usage::{EnrichedLog, ParsedCommit};

/// Source of an enriched commit log.
pub trait LogSource: Send + Sync {
    /// Loads the full log.
    fn load<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<EnrichedLog, LogError>> + Send + 'a>>;
}

/// Reads commit history from a git repository and flags commits that touched
/// currently staged files.
pub struct CommitLogProvider {
    path: PathBuf,
    branch: Option<String>,
    concurrency: usize,
    parser: Arc<dyn CommitParser>,
}

impl CommitLogProvider {
    /// Creates a provider using the parser described by `config.parser`.
    pub fn new(config: &UsageConfig) -> Result<Self, LogError> {
        let parser = ConventionalParser::new(&config.parser)?;
        Self::with_parser(config, Arc::new(parser))
    }

    /// Creates a provider with a custom commit parser.
    pub fn with_parser(
        config: &UsageConfig,
        parser: Arc<dyn CommitParser>,
    ) -> Result<Self, LogError> {
        Ok(Self {
            path: config.repository_path()?,
            branch: config.branch.clone(),
            concurrency: config.concurrency.max(1),
            parser,
        })
    }

    /// Repository location this provider reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walks history and status, then enriches every commit.
    pub async fn load_enriched(&self) -> Result<EnrichedLog, LogError> {
        let pool = self.open().await?;

        let history = collect_history(spawn_history_walk(
            Arc::clone(&pool),
            self.branch.clone(),
        ));
        let staged = staged_files(Arc::clone(&pool));
        let (commits, staged) = tokio::try_join!(history, staged)?;

        info!(
            commits = commits.len(),
            staged = staged.len(),
            path = %self.path.display(),
            "Loaded commit history"
        );

        let staged = Arc::new(staged);
        let permits = Arc::new(Semaphore::new(self.concurrency));

        let enrichments = commits.into_iter().map(|raw| {
            self.enrich(raw, Arc::clone(&pool), Arc::clone(&staged), Arc::clone(&permits))
        });
        let log = futures::future::try_join_all(enrichments).await?;

        debug!(
            relevant = log.iter().filter(|c| c.is_relevant_to_staged_files()).count(),
            "Enriched commit log"
        );

        Ok(log)
    }

    /// Walks and parses history without relevance information.
    pub async fn load_parsed(&self) -> Result<EnrichedLog, LogError> {
        let pool = self.open().await?;
        let commits = collect_history(spawn_history_walk(pool, self.branch.clone())).await?;

        info!(commits = commits.len(), path = %self.path.display(), "Loaded commit history");

        commits
            .into_iter()
            .map(|raw| {
                let id = raw.id.to_string();
                let parsed = self.parse(&id, &raw.message)?;
                Ok(ParsedCommit::from_parse(id, parsed))
            })
            .collect()
    }

    async fn open(&self) -> Result<Arc<RepositoryPool>, LogError> {
        let path = self.path.clone();
        let repo = tokio::task::spawn_blocking(move || GitRepository::open_at(&path))
            .await
            .map_err(LogError::task)??;

        Ok(Arc::new(RepositoryPool::new(self.path.clone(), repo)))
    }

    fn parse(&self, id: &str, message: &str) -> Result<ParseResult, LogError> {
        self.parser.parse(message).map_err(|e| LogError::Parse {
            commit: id.to_string(),
            message: format!("{e:#}"),
        })
    }

    /// Parses one commit and, if it is conventional, checks its diff
    /// against the staged files.
    async fn enrich(
        &self,
        raw: RawCommit,
        pool: Arc<RepositoryPool>,
        staged: Arc<HashSet<String>>,
        permits: Arc<Semaphore>,
    ) -> Result<ParsedCommit, LogError> {
        let id = raw.id.to_string();

        let ParseResult::Recognized(commit) = self.parse(&id, &raw.message)? else {
            return Ok(ParsedCommit::unrecognized(id));
        };

        // Nothing staged, nothing to match.
        if staged.is_empty() {
            return Ok(ParsedCommit::recognized(id, commit, false));
        }

        let _permit = permits.acquire_owned().await.map_err(LogError::task)?;
        let oid = raw.id;
        let relevant = tokio::task::spawn_blocking(move || {
            pool.with_repository(|repo| {
                let patches = repo.commit_patches(oid)?;
                Ok(patches.iter().any(|patch| patch.touches_any(&staged)))
            })
        })
        .await
        .map_err(LogError::task)??;

        Ok(ParsedCommit::recognized(id, commit, relevant))
    }
}

impl LogSource for CommitLogProvider {
    fn load<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<EnrichedLog, LogError>> + Send + 'a>> {
        Box::pin(self.load_enriched())
    }
}

async fn staged_files(pool: Arc<RepositoryPool>) -> Result<HashSet<String>, LogError> {
    tokio::task::spawn_blocking(move || pool.with_repository(GitRepository::staged_files))
        .await
        .map_err(LogError::task)?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parser_pattern_fails_construction() {
        let mut config = UsageConfig::at("/tmp");
        config.parser.header_pattern = "([".to_string();
        assert!(matches!(
            CommitLogProvider::new(&config),
            Err(LogError::InvalidPattern(_))
        ));
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let mut config = UsageConfig::at("/tmp");
        config.concurrency = 0;
        let provider = CommitLogProvider::new(&config).unwrap();
        assert_eq!(provider.concurrency, 1);
        assert_eq!(provider.path(), Path::new("/tmp"));
    }

    #[tokio::test]
    async fn missing_repository_fails_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let provider = CommitLogProvider::new(&UsageConfig::at(temp_dir.path())).unwrap();

        assert!(matches!(
            provider.load_enriched().await,
            Err(LogError::RepositoryOpen { .. })
        ));
        assert!(matches!(
            provider.load_parsed().await,
            Err(LogError::RepositoryOpen { .. })
        ));
    }
}
