//! Memoizing entry point for type and scope ranking.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::UsageConfig;
use crate::error::LogError;
use crate::usage::provider::{CommitLogProvider, LogSource};
use crate::usage::{scopes, types, EnrichedLog};

/// Answers ranking queries against one repository.
///
/// The enriched log is loaded on first use and shared by every later query,
/// including queries issued while the first load is still running. A failed
/// load is remembered as well; create a new helper to retry.
pub struct UsageHelper {
    source: Box<dyn LogSource>,
    log: OnceCell<Result<Arc<EnrichedLog>, LogError>>,
}

impl UsageHelper {
    /// Creates a helper reading the repository described by `config`.
    pub fn new(config: &UsageConfig) -> Result<Self, LogError> {
        Ok(Self::with_source(Box::new(CommitLogProvider::new(config)?)))
    }

    /// Creates a helper over an arbitrary log source.
    pub fn with_source(source: Box<dyn LogSource>) -> Self {
        Self {
            source,
            log: OnceCell::new(),
        }
    }

    /// Returns the enriched log, loading it on first call.
    pub async fn log(&self) -> Result<Arc<EnrichedLog>, LogError> {
        self.log
            .get_or_init(|| async { self.source.load().await.map(Arc::new) })
            .await
            .clone()
    }

    /// Orders `types` by usage, favouring types of commits that touched
    /// staged files.
    pub async fn sort_types_by_usage<S: AsRef<str>>(
        &self,
        types: &[S],
    ) -> Result<Vec<String>, LogError> {
        let log = self.log().await?;
        Ok(types::sort_types_by_usage(&log, types))
    }

    /// Orders the scopes seen in history for a commit of `commit_type`.
    pub async fn sorted_scopes_for_type(
        &self,
        commit_type: &str,
    ) -> Result<Vec<String>, LogError> {
        let log = self.log().await?;
        Ok(scopes::sorted_scopes_for_type(&log, commit_type))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::usage::test_utils::{commit, MockLogSource};

    fn scenario_helper() -> (UsageHelper, crate::usage::test_utils::LoadCountHandle) {
        let source = MockLogSource::new(Ok(vec![
            commit("feat", Some("core"), false),
            commit("fix", Some("core"), true),
            commit("feat", Some("ui"), false),
        ]));
        let loads = source.load_handle();
        (UsageHelper::with_source(Box::new(source)), loads)
    }

    #[tokio::test]
    async fn scenario_rankings() {
        let (helper, _) = scenario_helper();

        assert_eq!(
            helper.sort_types_by_usage(&["feat", "fix"]).await.unwrap(),
            vec!["fix", "feat"]
        );
        assert_eq!(
            helper.sorted_scopes_for_type("fix").await.unwrap(),
            vec!["core", "ui"]
        );
    }

    #[tokio::test]
    async fn repeated_queries_load_once() {
        let (helper, loads) = scenario_helper();

        let first = helper.sort_types_by_usage(&["feat", "fix"]).await.unwrap();
        let second = helper.sort_types_by_usage(&["feat", "fix"]).await.unwrap();
        let scopes_a = helper.sorted_scopes_for_type("feat").await.unwrap();
        let scopes_b = helper.sorted_scopes_for_type("feat").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(scopes_a, scopes_b);
        assert_eq!(loads.count(), 1);
    }

    #[tokio::test]
    async fn concurrent_queries_share_one_load() {
        let (helper, loads) = scenario_helper();

        let (types, scopes) = tokio::join!(
            helper.sort_types_by_usage(&["feat", "fix"]),
            helper.sorted_scopes_for_type("feat"),
        );

        assert_eq!(types.unwrap(), vec!["fix", "feat"]);
        assert_eq!(scopes.unwrap(), vec!["core", "ui"]);
        assert_eq!(loads.count(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_remembered() {
        let source = MockLogSource::new(Err(LogError::HistoryWalk("boom".to_string())));
        let loads = source.load_handle();
        let helper = UsageHelper::with_source(Box::new(source));

        let expected = Err(LogError::HistoryWalk("boom".to_string()));
        assert_eq!(helper.sort_types_by_usage(&["feat"]).await, expected);
        assert_eq!(helper.sorted_scopes_for_type("feat").await, expected);
        assert_eq!(loads.count(), 1);
    }

    #[tokio::test]
    async fn empty_log_gives_empty_shapes() {
        let helper = UsageHelper::with_source(Box::new(MockLogSource::new(Ok(Vec::new()))));

        assert_eq!(
            helper.sort_types_by_usage(&["feat", "fix"]).await.unwrap(),
            vec!["feat", "fix"]
        );
        assert!(helper.sorted_scopes_for_type("feat").await.unwrap().is_empty());
    }
}
