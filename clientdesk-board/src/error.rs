//! Error types for the board engine

use crate::types::{Lane, TaskId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: TaskId },

    /// Duplicate task ID in a load or insert
    #[error("duplicate task ID: {id}")]
    DuplicateTask { id: TaskId },

    /// A drag session is already active
    #[error("drag already in progress for task {active}")]
    DragInProgress { active: TaskId },

    /// A lane's ranks are not exactly 0..n
    #[error("rank density violated in lane '{lane}': expected rank {expected}, found {found}")]
    RankGap {
        lane: Lane,
        expected: u32,
        found: u32,
    },

    /// A lane name that matches none of the six lanes
    #[error("unknown lane '{name}'")]
    UnknownLane { name: String },

    /// The lane table does not list each lane exactly once
    #[error("invalid lane table: {message}")]
    InvalidLaneTable { message: String },

    /// Gateway settings that cannot be used
    #[error("invalid gateway configuration: {message}")]
    InvalidGatewayConfig { message: String },

    /// Failure talking to the system of record
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl BoardError {
    /// Create a task-not-found error
    pub fn task_not_found(id: impl Into<TaskId>) -> Self {
        Self::TaskNotFound { id: id.into() }
    }

    /// Create an invalid lane table error
    pub fn invalid_lane_table(message: impl Into<String>) -> Self {
        Self::InvalidLaneTable {
            message: message.into(),
        }
    }
}

/// Failure kinds returned by the external system of record.
///
/// Both kinds are handled identically by the board (reload, then notify);
/// the distinction is kept for callers that surface them differently.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GatewayError {
    /// The system of record rejected the move, e.g. a stale rank after a concurrent edit
    #[error("move of task {task_id} rejected: {message}")]
    Conflict { task_id: TaskId, message: String },

    /// The request never got a usable answer
    #[error("network error: {message}")]
    Network { message: String },
}

impl GatewayError {
    /// Create a conflict error
    pub fn conflict(task_id: impl Into<TaskId>, message: impl Into<String>) -> Self {
        Self::Conflict {
            task_id: task_id.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Check if this is a conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::task_not_found("abc123");
        assert_eq!(err.to_string(), "task not found: abc123");
    }

    #[test]
    fn test_rank_gap_display() {
        let err = BoardError::RankGap {
            lane: Lane::InReview,
            expected: 1,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "rank density violated in lane 'in_review': expected rank 1, found 3"
        );
    }

    #[test]
    fn test_unknown_lane_display() {
        let err = BoardError::UnknownLane {
            name: "archive".to_string(),
        };
        assert_eq!(err.to_string(), "unknown lane 'archive'");
    }

    #[test]
    fn test_gateway_error_is_transparent() {
        let err: BoardError = GatewayError::network("connection refused").into();
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn test_gateway_error_kinds() {
        assert!(GatewayError::conflict("t1", "stale rank").is_conflict());
        assert!(!GatewayError::network("timeout").is_conflict());
    }

    #[test]
    fn test_gateway_error_serializes_tagged() {
        let json = serde_json::to_value(GatewayError::network("down")).unwrap();
        assert_eq!(json["kind"], "network");
        assert_eq!(json["message"], "down");
    }
}
