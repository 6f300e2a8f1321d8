//! DragSession state machine
//!
//! Pointer activity is folded into a [`DragState`] by [`transition`], a pure
//! function of the current state, the event and a read-only view of the
//! store. It never mutates anything itself: the store changes it wants are
//! returned as [`DragEffect`]s for the caller to apply.
//!
//! ```text
//!            press               move >= threshold
//!   Idle ─────────────▶ Pressed ───────────────────▶ Dragging ──┐ hover
//!    ▲                    │ release / cancel          │  ▲       │ (soft move)
//!    │                    ▼                           │  └───────┘
//!    └──────────────── (click) ◀──────────────────────┤
//!                                   release over target: Dropped (commit)
//!                                   release outside / cancel: Cancelled (restore)
//! ```

use crate::error::{BoardError, Result};
use crate::gateway::MoveCommit;
use crate::store::{StoreSnapshot, TaskStore};
use crate::types::{Lane, Placement, TaskId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Default pointer travel, in pixels, before a press becomes a drag
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

/// Pointer position in presentation coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Drag tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Minimum pointer travel before a press activates a drag
    pub activation_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragTarget {
    /// A lane's empty area: append to that lane
    Lane { lane: Lane },
    /// A card: take that card's slot
    Task {
        #[serde(rename = "taskId", alias = "task_id")]
        task_id: TaskId,
    },
}

impl DragTarget {
    pub fn lane(lane: Lane) -> Self {
        Self::Lane { lane }
    }

    pub fn task(task_id: impl Into<TaskId>) -> Self {
        Self::Task {
            task_id: task_id.into(),
        }
    }
}

/// Input forwarded by the presentation layer. `over` is its hit test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Press {
        task: TaskId,
        at: Point,
    },
    Move {
        at: Point,
        #[serde(default)]
        over: Option<DragTarget>,
    },
    Release {
        #[serde(default)]
        over: Option<DragTarget>,
    },
    /// External cancellation (e.g. Escape, window blur)
    Cancel,
}

/// An active drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub active_task: TaskId,
    pub source_lane: Lane,
    pub source_index: usize,
    pub current_target: DragTarget,
    snapshot: Arc<StoreSnapshot>,
}

impl DragSession {
    /// Where the task was when the drag activated
    pub fn origin(&self) -> Placement {
        Placement::new(self.source_lane, self.source_index)
    }

    /// Store state captured at activation
    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }
}

/// Drag state machine
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is down on a card but has not travelled far enough yet
    Pressed { task: TaskId, origin: Point },
    Dragging(DragSession),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            _ => None,
        }
    }
}

/// Store changes requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    /// Optimistic, uncommitted reorder for live feedback
    SoftMove {
        task: TaskId,
        lane: Lane,
        index: usize,
    },
    /// Persist the final position. `fallback` is the pre-drag state.
    Commit {
        commit: MoveCommit,
        fallback: StoreSnapshot,
    },
    /// Roll back to a captured state
    Restore(StoreSnapshot),
}

/// How a session ended, when it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEnd {
    /// Press and release without activating
    Clicked,
    /// Released over a target; `committed` is false for a drop back onto the origin
    Dropped { committed: bool },
    Cancelled,
}

/// Result of one step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: DragState,
    pub effects: Vec<DragEffect>,
    pub ended: Option<DragEnd>,
}

impl Transition {
    fn to(next: DragState) -> Self {
        Self {
            next,
            effects: Vec::new(),
            ended: None,
        }
    }

    fn with_effect(mut self, effect: DragEffect) -> Self {
        self.effects.push(effect);
        self
    }

    fn ending(mut self, end: DragEnd) -> Self {
        self.ended = Some(end);
        self
    }
}

/// Advance the state machine by one event.
///
/// On `Err` the caller keeps `state`: a press while dragging is rejected with
/// [`BoardError::DragInProgress`] and leaves the active session untouched.
pub fn transition(
    state: &DragState,
    event: &PointerEvent,
    store: &TaskStore,
    config: &DragConfig,
) -> Result<Transition> {
    match (state, event) {
        (DragState::Dragging(session), PointerEvent::Press { task, .. }) => {
            debug!(active = %session.active_task, rejected = %task, "drag already in progress");
            Err(BoardError::DragInProgress {
                active: session.active_task.clone(),
            })
        }

        (_, PointerEvent::Press { task, at }) => {
            if store.get(task).is_none() {
                return Err(BoardError::task_not_found(task.clone()));
            }
            trace!(%task, "pointer down");
            Ok(Transition::to(DragState::Pressed {
                task: task.clone(),
                origin: *at,
            }))
        }

        (DragState::Pressed { task, origin }, PointerEvent::Move { at, over }) => {
            if origin.distance_to(at) < config.activation_distance {
                return Ok(Transition::to(state.clone()));
            }
            let session = activate(task, store)?;
            match over {
                Some(target) => hover(session, target, store),
                None => Ok(Transition::to(DragState::Dragging(session))),
            }
        }

        (DragState::Pressed { .. }, PointerEvent::Release { .. } | PointerEvent::Cancel) => {
            Ok(Transition::to(DragState::Idle).ending(DragEnd::Clicked))
        }

        (DragState::Dragging(session), PointerEvent::Move { over: Some(target), .. }) => {
            if *target == session.current_target {
                return Ok(Transition::to(state.clone()));
            }
            hover(session.clone(), target, store)
        }

        (DragState::Dragging(session), PointerEvent::Release { over: Some(target) }) => {
            drop_on(session, target, store)
        }

        (
            DragState::Dragging(session),
            PointerEvent::Release { over: None } | PointerEvent::Cancel,
        ) => {
            debug!(task = %session.active_task, "drag cancelled");
            Ok(Transition::to(DragState::Idle)
                .with_effect(DragEffect::Restore(session.snapshot().clone()))
                .ending(DragEnd::Cancelled))
        }

        // Moving with nothing under the pointer, or stray events while idle
        _ => Ok(Transition::to(state.clone())),
    }
}

/// Resolve a target to the slot the active task would occupy
pub fn resolve_target(
    active: &TaskId,
    target: &DragTarget,
    store: &TaskStore,
) -> Result<Placement> {
    let current = store
        .position(active)
        .ok_or_else(|| BoardError::task_not_found(active.clone()))?;

    match target {
        DragTarget::Task { task_id } if task_id == active => Ok(current),
        DragTarget::Task { task_id } => store
            .position(task_id)
            .ok_or_else(|| BoardError::task_not_found(task_id.clone())),
        DragTarget::Lane { lane } if *lane == current.lane => Ok(current),
        DragTarget::Lane { lane } => Ok(Placement::new(*lane, store.lane_len(*lane))),
    }
}

fn activate(task: &TaskId, store: &TaskStore) -> Result<DragSession> {
    let origin = store
        .position(task)
        .ok_or_else(|| BoardError::task_not_found(task.clone()))?;

    debug!(%task, %origin, "drag started");
    Ok(DragSession {
        active_task: task.clone(),
        source_lane: origin.lane,
        source_index: origin.index,
        current_target: DragTarget::task(task.clone()),
        snapshot: Arc::new(store.snapshot()),
    })
}

fn hover(mut session: DragSession, target: &DragTarget, store: &TaskStore) -> Result<Transition> {
    let current = store
        .position(&session.active_task)
        .ok_or_else(|| BoardError::task_not_found(session.active_task.clone()))?;
    let dest = resolve_target(&session.active_task, target, store)?;
    session.current_target = target.clone();

    let task = session.active_task.clone();
    let transition = Transition::to(DragState::Dragging(session));
    if dest == current {
        return Ok(transition);
    }

    trace!(%task, %dest, "soft move");
    Ok(transition.with_effect(DragEffect::SoftMove {
        task,
        lane: dest.lane,
        index: dest.index,
    }))
}

fn drop_on(session: &DragSession, target: &DragTarget, store: &TaskStore) -> Result<Transition> {
    let current = store
        .position(&session.active_task)
        .ok_or_else(|| BoardError::task_not_found(session.active_task.clone()))?;
    let dest = if *target == session.current_target {
        current
    } else {
        resolve_target(&session.active_task, target, store)?
    };

    let mut transition = Transition::to(DragState::Idle);
    if dest != current {
        transition = transition.with_effect(DragEffect::SoftMove {
            task: session.active_task.clone(),
            lane: dest.lane,
            index: dest.index,
        });
    }

    if dest == session.origin() {
        debug!(task = %session.active_task, "dropped on origin, nothing to commit");
        return Ok(transition.ending(DragEnd::Dropped { committed: false }));
    }

    debug!(task = %session.active_task, from = %session.origin(), to = %dest, "dropped");
    Ok(transition
        .with_effect(DragEffect::Commit {
            commit: MoveCommit::new(session.active_task.clone(), dest.lane, dest.index as u32),
            fallback: session.snapshot().clone(),
        })
        .ending(DragEnd::Dropped { committed: true }))
}
