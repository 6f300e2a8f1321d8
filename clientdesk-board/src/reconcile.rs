//! Commit dispatch and outcome collection
//!
//! A drop returns to idle before the network round-trip finishes. Each commit
//! runs on its own tokio task; when it fails, the same task fetches the
//! authoritative collection so the owner can reload without awaiting. The
//! owner drains outcomes between pointer events, so store mutations from a
//! failed commit never interleave with a transition.

use crate::error::GatewayError;
use crate::gateway::{MoveCommit, PersistenceGateway, TaskSource};
use crate::store::StoreSnapshot;
use crate::types::{CommitId, Task};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// The result of one dispatched commit
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    Committed {
        id: CommitId,
        commit: MoveCommit,
        elapsed: Duration,
    },
    Failed {
        id: CommitId,
        commit: MoveCommit,
        error: GatewayError,
        /// Authoritative tasks fetched after the failure
        reload: Result<Vec<Task>, GatewayError>,
        /// State before the optimistic move, used when the reload fails too
        fallback: StoreSnapshot,
        elapsed: Duration,
    },
}

impl CommitOutcome {
    pub fn id(&self) -> &CommitId {
        match self {
            Self::Committed { id, .. } | Self::Failed { id, .. } => id,
        }
    }

    pub fn commit(&self) -> &MoveCommit {
        match self {
            Self::Committed { commit, .. } | Self::Failed { commit, .. } => commit,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Fire-and-forget commit runner
pub struct CommitDispatcher {
    gateway: Arc<dyn PersistenceGateway>,
    source: Arc<dyn TaskSource>,
    tx: mpsc::UnboundedSender<CommitOutcome>,
    rx: mpsc::UnboundedReceiver<CommitOutcome>,
    in_flight: usize,
}

impl fmt::Debug for CommitDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitDispatcher")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl CommitDispatcher {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, source: Arc<dyn TaskSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            source,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start a commit in the background and return its id.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, commit: MoveCommit, fallback: StoreSnapshot) -> CommitId {
        let id = CommitId::new();
        let gateway = Arc::clone(&self.gateway);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        debug!(
            commit_id = %id,
            task = %commit.task_id,
            lane = %commit.lane,
            rank = commit.rank,
            "dispatching commit"
        );
        self.in_flight += 1;

        let task_id = id.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = match gateway.commit_move(&commit).await {
                Ok(()) => CommitOutcome::Committed {
                    id: task_id,
                    commit,
                    elapsed: started.elapsed(),
                },
                Err(error) => {
                    warn!(
                        commit_id = %task_id,
                        %error,
                        "commit failed, fetching authoritative tasks"
                    );
                    let reload = source.fetch_tasks().await;
                    CommitOutcome::Failed {
                        id: task_id,
                        commit,
                        error,
                        reload,
                        fallback,
                        elapsed: started.elapsed(),
                    }
                }
            };
            // The receiver lives as long as the dispatcher; a send error only
            // means the owner was dropped.
            let _ = tx.send(outcome);
        });

        id
    }

    /// Commits dispatched but not yet collected
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Take an outcome if one is ready
    pub fn try_next(&mut self) -> Option<CommitOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Wait for the next outcome; `None` when nothing is in flight
    pub async fn next(&mut self) -> Option<CommitOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(outcome)
    }
}
