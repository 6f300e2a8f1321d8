//! Board controller
//!
//! [`Board`] threads pointer events through the drag state machine, applies
//! the requested effects to the [`TaskStore`], keeps the [`ColumnIndex`] in
//! step, and folds commit outcomes back in. Nothing here awaits except the
//! explicit outcome waits ([`Board::next_outcome`], [`Board::settle`]).
//!
//! A reload fetched after one failed commit may predate other commits that
//! the server accepts. Moves confirmed while a reload could have missed them
//! are replayed on top of it, so once every commit has reported back the
//! store matches the system of record.

use crate::column_index::ColumnIndex;
use crate::drag::{self, DragConfig, DragEffect, DragEnd, DragState, PointerEvent};
use crate::error::{BoardError, GatewayError, Result};
use crate::gateway::{MoveCommit, PersistenceGateway, TaskSource};
use crate::reconcile::{CommitDispatcher, CommitOutcome};
use crate::store::{MoveOutcome, StoreSnapshot, TaskStore};
use crate::types::{
    ActivityEntry, ActivityLog, CommitId, Lane, LaneTable, Placement, Task, TaskId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default number of activity entries kept
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 100;

const MOVE_OP: &str = "move task";

/// Non-blocking notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A commit was rejected or never arrived; the store was reloaded
    CommitFailed {
        commit_id: CommitId,
        task_id: TaskId,
        error: GatewayError,
        /// False when the reload failed too and the pre-move state was restored
        reloaded: bool,
    },
    /// A reload landed mid-drag and ended the session
    DragAborted { task_id: TaskId },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommitFailed {
                task_id,
                error,
                reloaded,
                ..
            } => {
                let recovery = if *reloaded {
                    "reloaded from server"
                } else {
                    "restored previous order"
                };
                write!(
                    f,
                    "Could not move task {}: {} ({})",
                    task_id, error, recovery
                )
            }
            Self::DragAborted { task_id } => {
                write!(f, "Drag of task {} was interrupted by a reload", task_id)
            }
        }
    }
}

/// Book-keeping for a commit that has not reported back
#[derive(Debug, Clone, Copy)]
struct InFlight {
    /// Length of the confirmed log at dispatch
    confirmed_mark: usize,
    /// Reconciliations applied before dispatch
    epoch: u64,
}

/// The board: store, derived columns, drag state and commit reconciliation
#[derive(Debug)]
pub struct Board {
    store: TaskStore,
    lanes: LaneTable,
    index: ColumnIndex,
    drag: DragState,
    config: DragConfig,
    dispatcher: CommitDispatcher,
    notices: Vec<Notice>,
    activity: ActivityLog,
    revision: u64,
    in_flight: HashMap<CommitId, InFlight>,
    /// Moves confirmed while other commits were still out
    confirmed: Vec<MoveCommit>,
    /// Reloads and fallback restores applied so far
    reconciliations: u64,
}

impl Board {
    pub fn new(store: TaskStore, lanes: LaneTable, dispatcher: CommitDispatcher) -> Self {
        let index = ColumnIndex::derive(&store, &lanes);
        Self {
            store,
            lanes,
            index,
            drag: DragState::default(),
            config: DragConfig::default(),
            dispatcher,
            notices: Vec::new(),
            activity: ActivityLog::new(DEFAULT_ACTIVITY_CAPACITY),
            revision: 0,
            in_flight: HashMap::new(),
            confirmed: Vec::new(),
            reconciliations: 0,
        }
    }

    /// Build a board whose gateway also serves reloads
    pub fn with_gateway<G>(
        tasks: impl IntoIterator<Item = Task>,
        lanes: LaneTable,
        gateway: Arc<G>,
    ) -> Result<Self>
    where
        G: PersistenceGateway + TaskSource + 'static,
    {
        let store = TaskStore::from_tasks(tasks)?;
        let dispatcher = CommitDispatcher::new(gateway.clone(), gateway);
        Ok(Self::new(store, lanes, dispatcher))
    }

    pub fn with_drag_config(mut self, config: DragConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_activity_capacity(mut self, capacity: usize) -> Self {
        self.activity = ActivityLog::new(capacity);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn column_index(&self) -> &ColumnIndex {
        &self.index
    }

    pub fn lanes(&self) -> &LaneTable {
        &self.lanes
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Incremented on every store mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_commits(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Commit attempts, newest first
    pub fn activity(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.activity.entries()
    }

    /// Drain queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Feed one pointer event.
    ///
    /// On error the drag state and the store are left as they were.
    pub fn handle(&mut self, event: PointerEvent) -> Result<Option<DragEnd>> {
        let transition = drag::transition(&self.drag, &event, &self.store, &self.config)?;

        let mut mutated = false;
        for effect in transition.effects {
            match effect {
                DragEffect::SoftMove { task, lane, index } => {
                    mutated |= self.store.move_task(&task, lane, index)?.is_moved();
                }
                DragEffect::Restore(snapshot) => {
                    mutated |= self.store != *snapshot.store();
                    self.store.restore(snapshot);
                }
                DragEffect::Commit { commit, fallback } => {
                    self.dispatch(commit, fallback);
                }
            }
        }

        self.drag = transition.next;
        if mutated {
            self.touch();
        }
        Ok(transition.ended)
    }

    // =========================================================================
    // Programmatic commands
    // =========================================================================

    /// Move a task without a pointer (keyboard, context menu).
    ///
    /// Applies the move optimistically and commits it. Returns `None` when
    /// the clamped target is the task's current slot.
    pub fn move_task(
        &mut self,
        id: &TaskId,
        lane: Lane,
        index: usize,
    ) -> Result<Option<CommitId>> {
        self.ensure_not_dragging()?;

        let fallback = self.store.snapshot();
        match self.store.move_task(id, lane, index)? {
            MoveOutcome::Unchanged => Ok(None),
            MoveOutcome::Moved { to, .. } => {
                self.touch();
                Ok(Some(self.commit(id, to, fallback)))
            }
        }
    }

    /// Replace the whole collection
    pub fn load_tasks(&mut self, tasks: impl IntoIterator<Item = Task>) -> Result<()> {
        self.ensure_not_dragging()?;
        self.store.load_tasks(tasks)?;
        self.touch();
        Ok(())
    }

    /// Add a task created elsewhere
    pub fn insert_task(&mut self, task: Task) -> Result<Placement> {
        self.ensure_not_dragging()?;
        let placement = self.store.insert_task(task)?;
        self.touch();
        Ok(placement)
    }

    /// Drop a task deleted elsewhere
    pub fn remove_task(&mut self, id: &TaskId) -> Result<Task> {
        self.ensure_not_dragging()?;
        let task = self.store.remove_task(id)?;
        self.touch();
        Ok(task)
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Apply every outcome that has already arrived. Never waits.
    pub fn process_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.dispatcher.try_next() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for and apply the next outcome. Returns false when nothing is in flight.
    pub async fn next_outcome(&mut self) -> bool {
        match self.dispatcher.next().await {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// Wait until every dispatched commit has been applied
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while self.next_outcome().await {
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, outcome: CommitOutcome) {
        let dispatched = self.in_flight.remove(outcome.id());

        match outcome {
            CommitOutcome::Committed {
                id,
                commit,
                elapsed,
            } => {
                info!(
                    commit_id = %id,
                    task = %commit.task_id,
                    lane = %commit.lane,
                    rank = commit.rank,
                    "move committed"
                );
                // A reload applied since dispatch may not include this move
                if dispatched.is_none_or(|d| d.epoch < self.reconciliations) {
                    self.replay_confirmed(std::slice::from_ref(&commit));
                }
                self.activity.push(ActivityEntry::success(
                    MOVE_OP,
                    commit_json(&commit),
                    millis(elapsed),
                ));
                self.confirmed.push(commit);
            }
            CommitOutcome::Failed {
                id,
                commit,
                error,
                reload,
                fallback,
                elapsed,
            } => {
                warn!(commit_id = %id, task = %commit.task_id, %error, "move failed, reconciling");
                self.abort_drag();
                let reloaded = self.reload(reload, fallback);

                let mark = dispatched.map_or(0, |d| d.confirmed_mark);
                let since = self
                    .confirmed
                    .get(mark..)
                    .map(<[MoveCommit]>::to_vec)
                    .unwrap_or_default();
                self.replay_confirmed(&since);
                self.reconciliations += 1;

                self.activity.push(ActivityEntry::failure(
                    MOVE_OP,
                    commit_json(&commit),
                    &error.to_string(),
                    millis(elapsed),
                ));
                self.notices.push(Notice::CommitFailed {
                    commit_id: id,
                    task_id: commit.task_id,
                    error,
                    reloaded,
                });
            }
        }

        if self.in_flight.is_empty() {
            self.confirmed.clear();
        }
    }

    fn reload(
        &mut self,
        reload: std::result::Result<Vec<Task>, GatewayError>,
        fallback: StoreSnapshot,
    ) -> bool {
        let reloaded = match reload {
            Ok(tasks) => match self.store.load_tasks(tasks) {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "authoritative tasks rejected, restoring previous order");
                    self.store.restore(fallback);
                    false
                }
            },
            Err(e) => {
                warn!(error = %e, "reload failed, restoring previous order");
                self.store.restore(fallback);
                false
            }
        };
        self.touch();
        reloaded
    }

    /// Re-apply accepted moves on top of the current store.
    ///
    /// During a drag the moves go onto the drag's snapshot instead; if that
    /// changes it, the drag is aborted and the store takes the result.
    fn replay_confirmed(&mut self, commits: &[MoveCommit]) {
        if commits.is_empty() {
            return;
        }

        if let Some(session) = self.drag.session() {
            let mut base = session.snapshot().store().clone();
            if apply_commits(&mut base, commits) {
                self.abort_drag();
                self.store = base;
                self.touch();
            }
            return;
        }

        if apply_commits(&mut self.store, commits) {
            debug!(count = commits.len(), "replayed confirmed moves");
            self.touch();
        }
    }

    fn abort_drag(&mut self) {
        if let DragState::Dragging(session) = std::mem::take(&mut self.drag) {
            debug!(task = %session.active_task, "aborting drag for reload");
            self.notices.push(Notice::DragAborted {
                task_id: session.active_task,
            });
        }
    }

    fn commit(&mut self, id: &TaskId, to: Placement, fallback: StoreSnapshot) -> CommitId {
        let commit = MoveCommit::new(id.clone(), to.lane, to.index as u32);
        self.dispatch(commit, fallback)
    }

    fn dispatch(&mut self, commit: MoveCommit, fallback: StoreSnapshot) -> CommitId {
        let id = self.dispatcher.dispatch(commit, fallback);
        self.in_flight.insert(
            id.clone(),
            InFlight {
                confirmed_mark: self.confirmed.len(),
                epoch: self.reconciliations,
            },
        );
        id
    }

    fn ensure_not_dragging(&self) -> Result<()> {
        match self.drag.session() {
            Some(session) => Err(BoardError::DragInProgress {
                active: session.active_task.clone(),
            }),
            None => Ok(()),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.index = ColumnIndex::derive(&self.store, &self.lanes);
    }
}

/// Apply moves in order; true if any of them changed the store
fn apply_commits(store: &mut TaskStore, commits: &[MoveCommit]) -> bool {
    let mut changed = false;
    for commit in commits {
        match store.move_task(&commit.task_id, commit.lane, commit.rank as usize) {
            Ok(outcome) => changed |= outcome.is_moved(),
            Err(e) => {
                warn!(task = %commit.task_id, error = %e, "confirmed move no longer applies");
            }
        }
    }
    changed
}

fn commit_json(commit: &MoveCommit) -> serde_json::Value {
    serde_json::to_value(commit).unwrap_or_default()
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
