mod pathfinding;
mod selector;
mod threat;

pub use pathfinding::{HeuristicMode, find_path};
pub use selector::{ActionSelector, Decision, Goal};
pub use threat::{ThreatAssessor, is_bullet_threatening, kick_direction_to};
