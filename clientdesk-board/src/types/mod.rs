//! Core types for the board engine

mod ids;
mod lane;
mod log;
mod task;

// Re-export all types
pub use ids::{ActivityId, CommitId, TaskId};
pub use lane::{Lane, LaneMeta, LaneTable, Placement};
pub use log::{ActivityEntry, ActivityLog};
pub use task::{Priority, Task};
