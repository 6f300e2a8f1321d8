//! In-process system of record

use super::{MoveCommit, PersistenceGateway, TaskSource};
use crate::error::{GatewayError, Result};
use crate::store::TaskStore;
use crate::types::Task;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::debug;

/// A scripted commit failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Conflict,
    Network,
}

#[derive(Debug, Default)]
struct Inner {
    store: TaskStore,
    commit_failures: VecDeque<FailureKind>,
    fetch_failures: usize,
    received: Vec<MoveCommit>,
}

/// Authoritative state held in memory.
///
/// Applies committed moves with the same ordering algorithm as the client,
/// and can be told to fail upcoming calls.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    inner: Mutex<Inner>,
}

impl InMemoryGateway {
    /// Seed the authoritative state
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(Inner {
                store: TaskStore::from_tasks(tasks)?,
                ..Inner::default()
            }),
        })
    }

    /// Fail the next not-yet-failed commit with the given kind
    pub async fn fail_next_commit(&self, kind: FailureKind) {
        self.inner.lock().await.commit_failures.push_back(kind);
    }

    /// Fail the next fetch with a network error
    pub async fn fail_next_fetch(&self) {
        self.inner.lock().await.fetch_failures += 1;
    }

    /// Every commit received, including rejected ones, in arrival order
    pub async fn received(&self) -> Vec<MoveCommit> {
        self.inner.lock().await.received.clone()
    }

    /// Copy of the authoritative state
    pub async fn authoritative(&self) -> TaskStore {
        self.inner.lock().await.store.clone()
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn commit_move(&self, commit: &MoveCommit) -> std::result::Result<(), GatewayError> {
        let mut inner = self.inner.lock().await;
        inner.received.push(commit.clone());

        match inner.commit_failures.pop_front() {
            Some(FailureKind::Conflict) => {
                return Err(GatewayError::conflict(
                    commit.task_id.clone(),
                    "rank is stale",
                ))
            }
            Some(FailureKind::Network) => {
                return Err(GatewayError::network("connection reset"));
            }
            None => {}
        }

        let task_id = &commit.task_id;
        inner
            .store
            .move_task(task_id, commit.lane, commit.rank as usize)
            .map_err(|e| GatewayError::conflict(task_id.clone(), e.to_string()))?;

        debug!(
            task = %commit.task_id,
            lane = %commit.lane,
            rank = commit.rank,
            "in-memory commit applied"
        );
        Ok(())
    }
}

#[async_trait]
impl TaskSource for InMemoryGateway {
    async fn fetch_tasks(&self) -> std::result::Result<Vec<Task>, GatewayError> {
        let mut inner = self.inner.lock().await;
        if inner.fetch_failures > 0 {
            inner.fetch_failures -= 1;
            return Err(GatewayError::network("fetch failed"));
        }
        Ok(inner.store.to_tasks())
    }
}
