//! Terminal and JSON output

use crate::scenario::ReplayReport;
use anyhow::Result;
use clientdesk_board::{ColumnIndex, LaneTable, Task};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::fmt::Write;

const MAX_TITLE: usize = 32;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Truncate to `max` characters, appending "..." if truncated
fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn task_line(task: &Task) -> String {
    let title = truncate_str(&task.title, MAX_TITLE);
    format!("{}. {} {}", task.rank, task.id, title)
}

pub fn columns_table(index: &ColumnIndex) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Lane", "Count", "Tasks"]);
    for column in index.columns() {
        let tasks: Vec<String> = column.tasks.iter().map(task_line).collect();
        table.add_row(vec![
            column.label.clone(),
            column.len().to_string(),
            tasks.join("\n"),
        ]);
    }
    table
}

pub fn lanes_table(lanes: &LaneTable) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Lane", "Label", "Icon"]);
    for meta in lanes.iter() {
        table.add_row(vec![
            meta.lane.to_string(),
            meta.label.clone(),
            meta.icon.clone(),
        ]);
    }
    table
}

pub fn report_text(report: &ReplayReport) -> String {
    let mut out = columns_table(&report.columns).to_string();
    out.push('\n');

    let _ = writeln!(out, "Commits sent: {}", report.commits.len());
    for commit in &report.commits {
        let _ = writeln!(
            out,
            "  {} -> {}[{}]",
            commit.task_id, commit.lane, commit.rank
        );
    }
    for rejection in &report.rejected {
        let _ = writeln!(
            out,
            "Step {} rejected: {}",
            rejection.step, rejection.message
        );
    }
    for notice in &report.notices {
        let _ = writeln!(out, "! {}", notice);
    }
    out
}

pub fn report_json(report: &ReplayReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn lanes_json(lanes: &LaneTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(lanes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientdesk_board::{builtin_lane_table, Lane, TaskStore};

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn test_columns_table_lists_every_lane() {
        let store =
            TaskStore::from_tasks(vec![Task::new("T1", "Draft contract", Lane::Todo)]).unwrap();
        let index = ColumnIndex::derive(&store, &builtin_lane_table());
        let rendered = columns_table(&index).to_string();

        for meta in builtin_lane_table().iter() {
            assert!(rendered.contains(&meta.label), "missing {}", meta.label);
        }
        assert!(rendered.contains("0. T1 Draft contract"));
    }

    #[test]
    fn test_lanes_json_is_a_list() {
        let json: serde_json::Value =
            serde_json::from_str(&lanes_json(&builtin_lane_table()).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 6);
        assert_eq!(json[0]["lane"], "backlog");
    }
}
