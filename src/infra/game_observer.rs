use crate::infra::Action;
use crate::planners::heuristic::Decision;
use crate::state::{Map, MapState};

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called once before the first turn with the playthrough's level
    fn on_playthrough_start(&mut self, level: i32);

    /// Called when obstacles for a new episode have been loaded
    fn on_episode_start(&mut self, map: &Map);

    /// Called every PLAYING turn after the state is fetched
    fn on_state_update(&mut self, state: &MapState, turn: u32);

    /// Called when an action has been chosen, before it is submitted
    fn on_action_selected(&mut self, decision: &Decision, state: &MapState);

    /// Called when the server rejects an action because the level already ended
    fn on_map_already_over(&mut self, _action: Action) {}

    /// Called when the level is lost and about to be reset
    fn on_level_lost(&mut self, state: &MapState);

    /// Called when the level is won and about to be advanced
    fn on_level_won(&mut self, state: &MapState);

    /// Called after advancing, with the new level
    fn on_new_level(&mut self, level: i32);

    /// Called when the loop stops on request
    fn on_stopped(&mut self) {}
}
