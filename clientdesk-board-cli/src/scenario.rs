//! Scenario files and their replay
//!
//! ```yaml
//! tasks:
//!   - { id: T1, title: Draft contract, lane: backlog, rank: 0 }
//!   - { id: T2, title: Send invoice, lane: backlog, rank: 1 }
//! steps:
//!   - fail_next_commit: { kind: network }
//!   - press: { task: T1, x: 0, y: 0 }
//!   - move: { x: 20, y: 0, over: { lane: todo } }
//!   - release: { over: { lane: todo } }
//!   - settle
//! ```

use anyhow::{Context, Result};
use clientdesk_board::{
    Board, ColumnIndex, DragTarget, FailureKind, InMemoryGateway, Lane, MoveCommit,
    Notice, Point, PointerEvent, Task, TaskId,
};
use clientdesk_config::BoardConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Lane(Lane),
    Task(TaskId),
}

impl From<Target> for DragTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Lane(lane) => DragTarget::Lane { lane },
            Target::Task(task_id) => DragTarget::Task { task_id },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Press {
        task: TaskId,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        over: Option<Target>,
    },
    Release {
        #[serde(default)]
        over: Option<Target>,
    },
    Cancel,
    /// Keyboard-style move without a drag
    MoveTask {
        task: TaskId,
        lane: Lane,
        index: usize,
    },
    FailNextCommit {
        kind: FailureKind,
    },
    FailNextFetch,
    Settle,
}

/// A step the board refused
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    pub step: usize,
    pub message: String,
}

/// Final state after a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub columns: ColumnIndex,
    pub notices: Vec<Notice>,
    pub commits: Vec<MoveCommit>,
    pub rejected: Vec<Rejection>,
    pub revision: u64,
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    /// Run every step, settle outstanding commits and report
    pub async fn replay(self, config: &BoardConfig) -> Result<ReplayReport> {
        let gateway = Arc::new(InMemoryGateway::new(self.tasks.clone())?);
        let mut board = Board::with_gateway(self.tasks, config.lane_table(), gateway.clone())?
            .with_drag_config(config.drag_config())
            .with_activity_capacity(config.activity_capacity);

        let mut notices = Vec::new();
        let mut rejected = Vec::new();

        for (i, step) in self.steps.into_iter().enumerate() {
            debug!(step = i, ?step, "replaying");
            if let Err(e) = apply_step(&mut board, &gateway, step).await {
                info!(step = i, error = %e, "step rejected");
                rejected.push(Rejection {
                    step: i,
                    message: e.to_string(),
                });
            }
            board.process_outcomes();
            notices.extend(board.take_notices());
        }

        board.settle().await;
        notices.extend(board.take_notices());

        Ok(ReplayReport {
            columns: board.column_index().clone(),
            notices,
            commits: gateway.received().await,
            rejected,
            revision: board.revision(),
        })
    }
}

async fn apply_step(
    board: &mut Board,
    gateway: &InMemoryGateway,
    step: Step,
) -> clientdesk_board::Result<()> {
    match step {
        Step::Press { task, x, y } => {
            board.handle(PointerEvent::Press {
                task,
                at: Point::new(x, y),
            })?;
        }
        Step::Move { x, y, over } => {
            board.handle(PointerEvent::Move {
                at: Point::new(x, y),
                over: over.map(DragTarget::from),
            })?;
        }
        Step::Release { over } => {
            board.handle(PointerEvent::Release {
                over: over.map(DragTarget::from),
            })?;
        }
        Step::Cancel => {
            board.handle(PointerEvent::Cancel)?;
        }
        Step::MoveTask { task, lane, index } => {
            board.move_task(&task, lane, index)?;
        }
        Step::FailNextCommit { kind } => gateway.fail_next_commit(kind).await,
        Step::FailNextFetch => gateway.fail_next_fetch().await,
        Step::Settle => {
            board.settle().await;
        }
    }
    Ok(())
}
