//! Activity log entries for commit attempts

use super::ids::ActivityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

/// A log entry recording one commit attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Unique ID for this log entry
    pub id: ActivityId,

    /// When the outcome was applied
    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g., "move task")
    pub op: String,

    /// The commit triple
    pub input: Value,

    /// The result (or error)
    pub output: Value,

    /// Round-trip time of the commit
    pub duration_ms: u64,
}

impl ActivityEntry {
    /// Create a new log entry
    pub fn new(op: impl Into<String>, input: Value, output: Value, duration_ms: u64) -> Self {
        Self {
            id: ActivityId::new(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            duration_ms,
        }
    }

    /// Create a log entry for a successful operation
    pub fn success(op: impl Into<String>, input: Value, duration_ms: u64) -> Self {
        Self::new(
            op,
            input,
            serde_json::json!({ "status": "committed" }),
            duration_ms,
        )
    }

    /// Create a log entry for a failed operation
    pub fn failure(op: impl Into<String>, input: Value, error: &str, duration_ms: u64) -> Self {
        let output = serde_json::json!({ "error": error });
        Self::new(op, input, output, duration_ms)
    }

    /// Whether the entry records a failure
    pub fn is_failure(&self) -> bool {
        self.output.get("error").is_some()
    }
}

/// Bounded in-memory activity log, newest first
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    /// Record an entry, evicting the oldest when full
    pub fn push(&mut self, entry: ActivityEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_and_failure_entries() {
        let ok = ActivityEntry::success("move task", json!({"taskId": "T1"}), 12);
        assert!(!ok.is_failure());
        assert_eq!(ok.output["status"], "committed");

        let failed = ActivityEntry::failure("move task", json!({"taskId": "T1"}), "boom", 40);
        assert!(failed.is_failure());
        assert_eq!(failed.output["error"], "boom");
    }

    #[test]
    fn test_log_is_newest_first_and_bounded() {
        let mut log = ActivityLog::new(2);
        for i in 0..3 {
            log.push(ActivityEntry::success("move task", json!({ "n": i }), 0));
        }

        let ns: Vec<i64> = log
            .entries()
            .map(|e| e.input["n"].as_i64().unwrap())
            .collect();
        assert_eq!(ns, vec![2, 1]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut log = ActivityLog::new(0);
        log.push(ActivityEntry::success("move task", json!({}), 0));
        assert!(log.is_empty());
    }
}
