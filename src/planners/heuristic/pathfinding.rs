//! Heuristic selection for treasure paths.

use std::str::FromStr;

use crate::infra::{AStar, Position};
use crate::planners::heuristic::threat::ThreatAssessor;
use crate::state::Map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeuristicMode {
    /// Plain Manhattan distance. Shortest paths guaranteed.
    Admissible,
    /// Manhattan distance minus the proximity cost of the node.
    ///
    /// The subtracted term can push `h` below the true remaining distance
    /// and even below zero, so this is best-first search biased by threat
    /// proximity rather than classical A*. Returned paths are valid but not
    /// necessarily shortest.
    #[default]
    ThreatBiased,
}

impl FromStr for HeuristicMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admissible" | "manhattan" => Ok(HeuristicMode::Admissible),
            "threat" | "threat-biased" | "threat_biased" => Ok(HeuristicMode::ThreatBiased),
            other => Err(format!("unknown heuristic mode '{other}'")),
        }
    }
}

pub fn find_path(
    map: &Map,
    start: Position,
    goal: Position,
    mode: HeuristicMode,
    threats: &ThreatAssessor,
) -> Option<Vec<Position>> {
    match mode {
        HeuristicMode::Admissible => {
            AStar::find_path(map, start, goal, |pos| f64::from(pos.distance(&goal)))
        }
        HeuristicMode::ThreatBiased => AStar::find_path(map, start, goal, |pos| {
            f64::from(pos.distance(&goal)) - threats.proximity_cost(pos)
        }),
    }
}
