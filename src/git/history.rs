//! Streaming commit history walk.
//!
//! The walk runs on a blocking thread and pushes commits one at a time over a
//! bounded channel, finishing with exactly one terminal event.

use std::sync::Arc;

use git2::{Oid, Sort};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::LogError;
use crate::git::repository::{GitRepository, RepositoryPool};

/// Number of commits buffered between the walker and its consumer.
const WALK_CHANNEL_CAPACITY: usize = 256;

/// A commit as delivered by the history walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// Commit id.
    pub id: Oid,
    /// Full commit message, lossily decoded.
    pub message: String,
}

/// Events emitted by the history walk.
#[derive(Debug)]
pub enum WalkEvent {
    /// Next commit in time order.
    Commit(RawCommit),
    /// The walk finished normally.
    End,
    /// The walk stopped on an error.
    Failed(LogError),
}

/// Starts walking history from the primary branch tip.
///
/// Must be called from within a tokio runtime.
pub fn spawn_history_walk(
    pool: Arc<RepositoryPool>,
    branch: Option<String>,
) -> mpsc::Receiver<WalkEvent> {
    let (tx, rx) = mpsc::channel(WALK_CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        let outcome = pool.with_repository(|repo| walk(repo, branch.as_deref(), &tx));
        let terminal = match outcome {
            Ok(()) => WalkEvent::End,
            Err(e) => WalkEvent::Failed(e),
        };
        // The consumer may already be gone.
        let _ = tx.blocking_send(terminal);
    });

    rx
}

fn walk(
    repo: &GitRepository,
    branch: Option<&str>,
    tx: &mpsc::Sender<WalkEvent>,
) -> Result<(), LogError> {
    let walk_error = |e: git2::Error| LogError::HistoryWalk(e.message().to_string());

    let tip = repo.branch_tip(branch)?;
    let git = repo.repository();

    let mut revwalk = git.revwalk().map_err(walk_error)?;
    revwalk.set_sorting(Sort::TIME).map_err(walk_error)?;
    revwalk.push(tip).map_err(walk_error)?;

    let mut walked = 0usize;
    for oid in revwalk {
        let oid = oid.map_err(walk_error)?;
        let commit = git.find_commit(oid).map_err(walk_error)?;
        let raw = RawCommit {
            id: oid,
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        };

        if tx.blocking_send(WalkEvent::Commit(raw)).is_err() {
            debug!(walked, "History consumer dropped, stopping walk");
            return Ok(());
        }
        walked += 1;
    }

    debug!(walked, %tip, "History walk finished");
    Ok(())
}

/// Drains walk events into an ordered buffer.
pub async fn collect_history(
    mut events: mpsc::Receiver<WalkEvent>,
) -> Result<Vec<RawCommit>, LogError> {
    let mut commits = Vec::new();

    while let Some(event) = events.recv().await {
        match event {
            WalkEvent::Commit(commit) => commits.push(commit),
            WalkEvent::End => return Ok(commits),
            WalkEvent::Failed(e) => return Err(e),
        }
    }

    Err(LogError::HistoryWalk(
        "walker stopped without a completion signal".to_string(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(message: &str) -> RawCommit {
        RawCommit {
            id: Oid::zero(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn collects_commits_in_order_until_end() {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            tx.send(WalkEvent::Commit(raw("feat: b"))).await.unwrap();
            tx.send(WalkEvent::Commit(raw("feat: a"))).await.unwrap();
            tx.send(WalkEvent::End).await.unwrap();
        });

        let commits = collect_history(rx).await.unwrap();
        let messages: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["feat: b", "feat: a"]);
    }

    #[tokio::test]
    async fn failure_event_discards_partial_history() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(WalkEvent::Commit(raw("feat: a"))).await.unwrap();
        tx.send(WalkEvent::Failed(LogError::HistoryWalk("corrupt".to_string())))
            .await
            .unwrap();

        assert_eq!(
            collect_history(rx).await,
            Err(LogError::HistoryWalk("corrupt".to_string()))
        );
    }

    #[tokio::test]
    async fn closed_channel_without_end_is_an_error() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(WalkEvent::Commit(raw("feat: a"))).await.unwrap();
        drop(tx);

        assert!(matches!(
            collect_history(rx).await,
            Err(LogError::HistoryWalk(_))
        ));
    }
}
