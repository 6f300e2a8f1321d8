//! ColumnIndex - the read-only lane-grouped view of a TaskStore

use crate::error::Result;
use crate::store::TaskStore;
use crate::types::{Lane, LaneTable, Task, TaskId};
use serde::Serialize;

/// One rendered lane
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub lane: Lane,
    pub label: String,
    pub icon: String,
    /// Tasks ascending by rank
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Tasks grouped by lane, in lane-table order.
///
/// Derived from a store and never written to; `derive` is a pure function of
/// its inputs, so two derivations from equal stores serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnIndex {
    columns: Vec<Column>,
}

impl ColumnIndex {
    /// Build the view
    pub fn derive(store: &TaskStore, lanes: &LaneTable) -> Self {
        let columns = lanes
            .iter()
            .map(|meta| Column {
                lane: meta.lane,
                label: meta.label.clone(),
                icon: meta.icon.clone(),
                tasks: store.tasks_by_lane(meta.lane).cloned().collect(),
            })
            .collect();

        Self { columns }
    }

    /// Columns in display order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The column for a lane
    pub fn column(&self, lane: Lane) -> Option<&Column> {
        self.columns.iter().find(|c| c.lane == lane)
    }

    /// Task ids in a lane, in rank order
    pub fn task_ids(&self, lane: Lane) -> Vec<&TaskId> {
        self.column(lane)
            .map(|c| c.tasks.iter().map(|t| &t.id).collect())
            .unwrap_or_default()
    }

    /// Total number of tasks across all columns
    pub fn total(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Pretty JSON rendering for the presentation layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
