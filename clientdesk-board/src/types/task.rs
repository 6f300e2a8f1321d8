//! Task types: Task, Priority

use super::ids::TaskId;
use super::lane::Lane;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Task priority, ordered from least to most urgent
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// A card on the board.
///
/// `lane` and `rank` are owned by the store; everything else is host data
/// the board carries through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Which lane the task is in
    #[serde(alias = "status")]
    pub lane: Lane,

    /// Dense 0-based position within the lane
    #[serde(default, alias = "order")]
    pub rank: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Read-only annotations
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub attachment_count: u32,
}

impl Task {
    /// Create a new task at the top of a lane
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, lane: Lane) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            lane,
            rank: 0,
            assignee: None,
            due_date: None,
            priority: Priority::default(),
            tags: BTreeSet::new(),
            comment_count: 0,
            attachment_count: 0,
        }
    }

    /// Set the rank
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = rank;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the assignee
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("T1", "Write proposal", Lane::Backlog);
        assert_eq!(task.title, "Write proposal");
        assert_eq!(task.rank, 0);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Urgent);
    }

    #[test]
    fn test_task_reads_host_field_names() {
        // The host API calls these `status` and `order`
        let json = r#"{
            "id": "T9",
            "title": "Invoice review",
            "status": "in_review",
            "order": 3,
            "priority": "high",
            "tags": ["billing", "q3"],
            "comment_count": 2
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.lane, Lane::InReview);
        assert_eq!(task.rank, 3);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.tags.len(), 2);
        assert_eq!(task.comment_count, 2);
        assert_eq!(task.attachment_count, 0);
    }
}
