//! Shared test utilities for the `usage` module.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::LogError;
use crate::parser::ConventionalCommit;
use crate::usage::provider::LogSource;
use crate::usage::{EnrichedLog, ParsedCommit};

/// Builds a conventional commit fixture.
pub(crate) fn commit(commit_type: &str, scope: Option<&str>, relevant: bool) -> ParsedCommit {
    ParsedCommit::recognized(
        format!("{commit_type}-{}", scope.unwrap_or("none")),
        ConventionalCommit::new(commit_type, scope),
        relevant,
    )
}

/// Builds a non-conventional commit fixture.
pub(crate) fn unrecognized() -> ParsedCommit {
    ParsedCommit::unrecognized("free-text")
}

/// Log source returning a fixed outcome and counting loads.
///
/// Each load yields to the runtime briefly so concurrent callers overlap.
pub(crate) struct MockLogSource {
    outcome: Result<EnrichedLog, LogError>,
    loads: Arc<AtomicUsize>,
}

impl MockLogSource {
    pub(crate) fn new(outcome: Result<EnrichedLog, LogError>) -> Self {
        Self {
            outcome,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a handle for reading the load count after the source has
    /// been moved into a helper.
    pub(crate) fn load_handle(&self) -> LoadCountHandle {
        LoadCountHandle {
            loads: Arc::clone(&self.loads),
        }
    }
}

/// Shared handle to a mock source's load counter.
pub(crate) struct LoadCountHandle {
    loads: Arc<AtomicUsize>,
}

impl LoadCountHandle {
    /// Returns how many times the source was loaded.
    pub(crate) fn count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl LogSource for MockLogSource {
    fn load<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<EnrichedLog, LogError>> + Send + 'a>> {
        Box::pin(async move {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.outcome.clone()
        })
    }
}
