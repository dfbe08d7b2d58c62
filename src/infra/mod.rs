pub mod api;
mod composite_observer;
mod config;
mod default_observer;
mod game_observer;
mod pathfinding;
mod replay;
mod types;

pub use api::{ConflictReason, GameService, PonyPanicClient, ServiceError};
pub use composite_observer::CompositeObserver;
pub use config::{Config, ConfigError};
pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use pathfinding::AStar;
pub use replay::ReplayObserver;
pub use types::{Action, Bounds, Direction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("next step {to:?} is not one orthogonal move from {from:?}")]
    NotOrthogonal { from: Position, to: Position },
}

// ============================================================================
// Helper functions
// ============================================================================

/// Move that takes the hero from `current` onto the first step of `path`.
/// An empty path needs no move.
pub fn path_to_action(current: Position, path: &[Position]) -> Result<Option<Action>, StepError> {
    let Some(&next) = path.first() else {
        return Ok(None);
    };
    if !current.is_adjacent(&next) {
        tracing::error!(?current, ?next, "Planner produced a non-orthogonal step");
        return Err(StepError::NotOrthogonal {
            from: current,
            to: next,
        });
    }

    let direction = if next.x > current.x {
        Direction::Right
    } else if next.x < current.x {
        Direction::Left
    } else if next.y > current.y {
        Direction::Up
    } else {
        Direction::Down
    };
    Ok(Some(direction.move_action()))
}
