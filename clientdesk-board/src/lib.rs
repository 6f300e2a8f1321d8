//! Task-board ordering engine
//!
//! Tasks live in six fixed lanes and carry a dense rank within their lane.
//! This crate owns that ordering, drives pointer-based drag sessions, and
//! reconciles optimistic moves against an external system of record.
//!
//! ## Overview
//!
//! - **Dense ranks** - after every mutation each lane's ranks are exactly `0..n`
//! - **Pure drag transitions** - [`drag::transition`] maps state + event to effects
//! - **Optimistic commits** - the board reflects a drop immediately; the commit
//!   runs in the background and a failure reloads from the authoritative source
//! - **Derived columns** - [`ColumnIndex`] is recomputed after every store change
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use clientdesk_board::{builtin_lane_table, Board, InMemoryGateway, Lane, Task, TaskId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tasks = vec![
//!     Task::new("T1", "Draft contract", Lane::Backlog),
//!     Task::new("T2", "Send invoice", Lane::Backlog).with_rank(1),
//! ];
//! let gateway = Arc::new(InMemoryGateway::new(tasks.clone())?);
//! let mut board = Board::with_gateway(tasks, builtin_lane_table(), gateway)?;
//!
//! board.move_task(&TaskId::from_string("T1"), Lane::Todo, 0)?;
//! board.settle().await;
//!
//! for column in board.column_index().columns() {
//!     println!("{}: {}", column.label, column.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod column_index;
pub mod defaults;
pub mod drag;
mod error;
pub mod gateway;
pub mod reconcile;
pub mod store;
pub mod types;

pub use board::{Board, Notice, DEFAULT_ACTIVITY_CAPACITY};
pub use column_index::{Column, ColumnIndex};
pub use defaults::{builtin_lane_table, parse_lane_table};
pub use drag::{
    DragConfig, DragEnd, DragSession, DragState, DragTarget, Point, PointerEvent,
    DEFAULT_ACTIVATION_DISTANCE,
};
pub use error::{BoardError, GatewayError, Result};
pub use gateway::{
    FailureKind, HttpGateway, HttpGatewayConfig, InMemoryGateway, MoveCommit, PersistenceGateway,
    TaskSource,
};
pub use reconcile::{CommitDispatcher, CommitOutcome};
pub use store::{MoveOutcome, StoreSnapshot, TaskStore};

// Re-export commonly used types
pub use types::{
    ActivityEntry, ActivityId, CommitId, Lane, LaneMeta, LaneTable, Placement, Priority, Task,
    TaskId,
};
