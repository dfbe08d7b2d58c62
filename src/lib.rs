pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use game::{ControllerError, LoopExit, StopSignal, TurnController, TurnOutcome};
pub use infra::{AStar, Action, GameService, PonyPanicClient, Position};
pub use state::Map;
