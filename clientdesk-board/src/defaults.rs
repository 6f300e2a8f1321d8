//! Built-in lane table.
//!
//! The six lanes and their display metadata ship as embedded YAML. Hosts can
//! replace labels and icons through configuration, but the set of lanes is
//! fixed.

use crate::error::Result;
use crate::types::LaneTable;

const BUILTIN_LANES_YAML: &str = include_str!("../builtin/lanes.yaml");

/// Parse a lane table from YAML (a list of `{lane, label, icon}`)
pub fn parse_lane_table(yaml: &str) -> Result<LaneTable> {
    Ok(serde_yaml_ng::from_str(yaml)?)
}

/// The lane table shipped with the crate
pub fn builtin_lane_table() -> LaneTable {
    parse_lane_table(BUILTIN_LANES_YAML).expect("invalid built-in lane table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::types::Lane;

    #[test]
    fn test_builtin_table_parses() {
        let table = builtin_lane_table();
        let order: Vec<Lane> = table.iter().map(|m| m.lane).collect();
        assert_eq!(order, Lane::ALL.to_vec());
        assert_eq!(table.get(Lane::Todo).unwrap().label, "To Do");
        assert_eq!(table.get(Lane::InProgress).unwrap().icon, "timer");
    }

    #[test]
    fn test_parse_rejects_incomplete_table() {
        let yaml = "- lane: todo\n  label: To Do\n";
        let result = parse_lane_table(yaml);
        assert!(matches!(result, Err(BoardError::Yaml(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_lane() {
        let yaml = "- lane: archived\n  label: Archived\n";
        assert!(parse_lane_table(yaml).is_err());
    }
}
