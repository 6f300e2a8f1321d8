//! TaskStore - the owned task collection and its ordering algorithm
//!
//! Every lane holds an ordered list of task ids, and every task's `rank`
//! equals its index in that list. All mutations go through this type and
//! renumber the lanes they touch before returning, so the rank-density
//! invariant (`ranks == {0, 1, ..., n-1}` per lane) holds between any two
//! calls.

use crate::error::{BoardError, Result};
use crate::types::{Lane, Placement, Task, TaskId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// The authoritative in-memory task collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: HashMap<TaskId, Task>,
    /// Task ids per lane, indexed by `Lane::index()`, in rank order
    lanes: [Vec<TaskId>; 6],
}

/// Full store state captured by value for rollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot(TaskStore);

impl StoreSnapshot {
    /// View the captured state
    pub fn store(&self) -> &TaskStore {
        &self.0
    }
}

/// What a call to [`TaskStore::move_task`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The task changed position
    Moved { from: Placement, to: Placement },
    /// The clamped target equals the current position; nothing changed
    Unchanged,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an initial task collection
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self> {
        let mut store = Self::new();
        store.load_tasks(tasks)?;
        Ok(store)
    }

    // =========================================================================
    // Bulk replacement
    // =========================================================================

    /// Replace the entire collection.
    ///
    /// Incoming ranks are treated as a sort key only: each lane is ordered by
    /// (rank, id) and renumbered densely. Fails without touching the current
    /// state if two tasks share an id.
    pub fn load_tasks(&mut self, tasks: impl IntoIterator<Item = Task>) -> Result<()> {
        let mut by_id = HashMap::new();
        let mut keyed: [Vec<(u32, TaskId)>; 6] = Default::default();

        for task in tasks {
            if by_id.contains_key(&task.id) {
                return Err(BoardError::DuplicateTask { id: task.id });
            }
            keyed[task.lane.index()].push((task.rank, task.id.clone()));
            by_id.insert(task.id.clone(), task);
        }

        let mut next = Self {
            tasks: by_id,
            lanes: Default::default(),
        };
        for (lane, mut entries) in Lane::ALL.into_iter().zip(keyed) {
            entries.sort();
            next.lanes[lane.index()] = entries.into_iter().map(|(_, id)| id).collect();
            next.renumber(lane);
        }

        debug!(tasks = next.tasks.len(), "loaded task collection");
        *self = next;
        self.debug_check();
        Ok(())
    }

    /// Capture the full state by value
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot(self.clone())
    }

    /// Restore a previously captured state
    pub fn restore(&mut self, snapshot: StoreSnapshot) {
        *self = snapshot.0;
        self.debug_check();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Move a task to `target_index` in `target_lane`.
    ///
    /// The index is clamped to the destination lane's length after the task
    /// has been taken out of its current slot, so any index past the end
    /// appends. Returns [`MoveOutcome::Unchanged`] when the clamped target is
    /// the task's current slot.
    pub fn move_task(
        &mut self,
        id: &TaskId,
        target_lane: Lane,
        target_index: usize,
    ) -> Result<MoveOutcome> {
        let from = self
            .position(id)
            .ok_or_else(|| BoardError::task_not_found(id.clone()))?;

        let index = self.clamp_index(from, target_lane, target_index);
        let to = Placement::new(target_lane, index);
        if to == from {
            trace!(task = %id, at = %from, "move is a no-op");
            return Ok(MoveOutcome::Unchanged);
        }

        let moved = self.lanes[from.lane.index()].remove(from.index);
        self.lanes[to.lane.index()].insert(to.index, moved);

        self.renumber(from.lane);
        if to.lane != from.lane {
            self.renumber(to.lane);
        }

        debug!(task = %id, %from, %to, "moved task");
        self.debug_check();
        Ok(MoveOutcome::Moved { from, to })
    }

    /// Add a task created elsewhere. It lands at its rank, clamped to the end
    /// of its lane.
    pub fn insert_task(&mut self, task: Task) -> Result<Placement> {
        if self.tasks.contains_key(&task.id) {
            return Err(BoardError::DuplicateTask { id: task.id });
        }

        let lane = task.lane;
        let slot = &mut self.lanes[lane.index()];
        let index = (task.rank as usize).min(slot.len());
        slot.insert(index, task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        self.renumber(lane);

        self.debug_check();
        Ok(Placement::new(lane, index))
    }

    /// Remove a task deleted elsewhere and close the gap it leaves
    pub fn remove_task(&mut self, id: &TaskId) -> Result<Task> {
        let at = self
            .position(id)
            .ok_or_else(|| BoardError::task_not_found(id.clone()))?;

        self.lanes[at.lane.index()].remove(at.index);
        let task = self
            .tasks
            .remove(id)
            .ok_or_else(|| BoardError::task_not_found(id.clone()))?;
        self.renumber(at.lane);

        self.debug_check();
        Ok(task)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Tasks in a lane, ascending by rank.
    ///
    /// The iterator is lazy and `Clone`, so a consumer can restart it.
    pub fn tasks_by_lane(&self, lane: Lane) -> impl Iterator<Item = &Task> + Clone + '_ {
        self.lanes[lane.index()]
            .iter()
            .filter_map(move |id| self.tasks.get(id))
    }

    /// Task ids in a lane, in rank order
    pub fn task_ids(&self, lane: Lane) -> &[TaskId] {
        &self.lanes[lane.index()]
    }

    /// All tasks, lane by lane in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        Lane::ALL
            .into_iter()
            .flat_map(move |lane| self.tasks_by_lane(lane))
    }

    /// Look up a task
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Current lane and index of a task
    pub fn position(&self, id: &TaskId) -> Option<Placement> {
        let task = self.tasks.get(id)?;
        Some(Placement::new(task.lane, task.rank as usize))
    }

    /// Number of tasks in a lane
    pub fn lane_len(&self, lane: Lane) -> usize {
        self.lanes[lane.index()].len()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Owned copy of every task, in lane then rank order
    pub fn to_tasks(&self) -> Vec<Task> {
        self.iter().cloned().collect()
    }

    /// Verify the rank-density invariant for every lane
    pub fn check_density(&self) -> Result<()> {
        for lane in Lane::ALL {
            for (expected, id) in self.lanes[lane.index()].iter().enumerate() {
                let expected = expected as u32;
                let task = self
                    .tasks
                    .get(id)
                    .ok_or_else(|| BoardError::task_not_found(id.clone()))?;
                if task.lane != lane || task.rank != expected {
                    return Err(BoardError::RankGap {
                        lane,
                        expected,
                        found: task.rank,
                    });
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Clamp a requested index to `[0, len]`, where `len` excludes the task
    /// itself when it is already in the destination lane
    fn clamp_index(&self, from: Placement, target_lane: Lane, target_index: usize) -> usize {
        let mut len = self.lane_len(target_lane);
        if from.lane == target_lane {
            len -= 1;
        }
        target_index.min(len)
    }

    /// Rewrite lane and rank of every task in `lane` from its slot
    fn renumber(&mut self, lane: Lane) {
        let Self { tasks, lanes } = self;
        for (rank, id) in lanes[lane.index()].iter().enumerate() {
            if let Some(task) = tasks.get_mut(id) {
                task.lane = lane;
                task.rank = rank as u32;
            }
        }
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_density().is_ok(),
            "rank density violated: {:?}",
            self.check_density()
        );
    }
}
