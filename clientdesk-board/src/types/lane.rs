//! Lane types: the fixed set of statuses and their display metadata

use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six fixed statuses a task can be in.
///
/// Any lane is reachable from any other in a single move; there is no
/// enforced workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Completed,
    Blocked,
}

impl Lane {
    /// All lanes in canonical order
    pub const ALL: [Lane; 6] = [
        Lane::Backlog,
        Lane::Todo,
        Lane::InProgress,
        Lane::InReview,
        Lane::Completed,
        Lane::Blocked,
    ];

    /// Position of this lane in [`Lane::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::Backlog => 0,
            Self::Todo => 1,
            Self::InProgress => 2,
            Self::InReview => 3,
            Self::Completed => 4,
            Self::Blocked => 5,
        }
    }

    /// The serialized (snake_case) name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::InReview => "in_review",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = BoardError;

    /// Accepts `in_progress`, `in-progress` and `In Progress` alike.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Lane::ALL
            .into_iter()
            .find(|lane| lane.as_str().replace('_', "") == normalized)
            .ok_or_else(|| BoardError::UnknownLane {
                name: s.to_string(),
            })
    }
}

/// A task's position: lane plus 0-based index within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub lane: Lane,
    pub index: usize,
}

impl Placement {
    pub fn new(lane: Lane, index: usize) -> Self {
        Self { lane, index }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.lane, self.index)
    }
}

/// Display metadata for one lane, supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneMeta {
    pub lane: Lane,
    pub label: String,
    #[serde(default)]
    pub icon: String,
}

impl LaneMeta {
    pub fn new(lane: Lane, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            lane,
            label: label.into(),
            icon: icon.into(),
        }
    }
}

/// The static lane configuration. Order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LaneTable {
    lanes: Vec<LaneMeta>,
}

impl LaneTable {
    /// Build a table, checking that every lane appears exactly once
    pub fn new(lanes: Vec<LaneMeta>) -> Result<Self> {
        if lanes.len() != Lane::ALL.len() {
            return Err(BoardError::invalid_lane_table(format!(
                "expected {} lanes, got {}",
                Lane::ALL.len(),
                lanes.len()
            )));
        }

        let mut seen = [false; 6];
        for meta in &lanes {
            let slot = &mut seen[meta.lane.index()];
            if *slot {
                return Err(BoardError::invalid_lane_table(format!(
                    "lane '{}' listed more than once",
                    meta.lane
                )));
            }
            *slot = true;
        }

        Ok(Self { lanes })
    }

    /// Metadata for a lane
    pub fn get(&self, lane: Lane) -> Option<&LaneMeta> {
        self.lanes.iter().find(|m| m.lane == lane)
    }

    /// Iterate lanes in display order
    pub fn iter(&self) -> impl Iterator<Item = &LaneMeta> {
        self.lanes.iter()
    }

    /// Replace label/icon for the lanes present in `overrides`, keeping order
    pub fn with_overrides(mut self, overrides: &[LaneMeta]) -> Self {
        for o in overrides {
            if let Some(meta) = self.lanes.iter_mut().find(|m| m.lane == o.lane) {
                meta.label = o.label.clone();
                if !o.icon.is_empty() {
                    meta.icon = o.icon.clone();
                }
            }
        }
        self
    }
}

impl<'de> Deserialize<'de> for LaneTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let lanes = Vec::<LaneMeta>::deserialize(deserializer)?;
        LaneTable::new(lanes).map_err(serde::de::Error::custom)
    }
}
