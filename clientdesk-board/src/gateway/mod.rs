//! PersistenceGateway - the seam to the external system of record
//!
//! A committed move is the logical triple [`MoveCommit`]. How it travels is
//! up to the implementation: [`InMemoryGateway`] keeps the authoritative
//! state in process (tests, replay), [`HttpGateway`] talks to the host's
//! REST API.

mod http;
mod memory;

pub use http::{HttpGateway, HttpGatewayConfig};
pub use memory::{FailureKind, InMemoryGateway};

use crate::error::GatewayError;
use crate::types::{Lane, Task, TaskId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The only payload the core sends out: which task, which lane, which rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCommit {
    pub task_id: TaskId,
    pub lane: Lane,
    pub rank: u32,
}

impl MoveCommit {
    pub fn new(task_id: impl Into<TaskId>, lane: Lane, rank: u32) -> Self {
        Self {
            task_id: task_id.into(),
            lane,
            rank,
        }
    }
}

/// Persists a finished move.
///
/// Implementations must not retry on their own; a failure is reported once
/// and the board reloads from [`TaskSource`].
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn commit_move(&self, commit: &MoveCommit) -> Result<(), GatewayError>;
}

/// Supplies the authoritative task collection for reload-on-failure
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, GatewayError>;
}
