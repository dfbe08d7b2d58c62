use crate::infra::{Action, GameObserver};
use crate::planners::heuristic::Decision;
use crate::state::{Map, MapState};
use tracing::{debug, info, warn};

pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_playthrough_start(&mut self, level: i32) {
        info!("Playthrough at level {}", level);
    }

    fn on_episode_start(&mut self, map: &Map) {
        info!("Episode started");
        info!("- map size: {}x{}", map.width(), map.height());
        info!("- obstacles: {}", map.obstacles().len());
    }

    fn on_state_update(&mut self, state: &MapState, turn: u32) {
        debug!(
            "turn: {}, hero: ({}, {}), enemies: {}, bullets: {}, treasures left: {}",
            turn,
            state.hero.x,
            state.hero.y,
            state.enemies.len(),
            state.bullets.len(),
            state.uncollected_treasures().count(),
        );
    }

    fn on_action_selected(&mut self, decision: &Decision, _state: &MapState) {
        info!("goal: {:?}, action: {}", decision.goal, decision.action.as_str_name());
    }

    fn on_map_already_over(&mut self, action: Action) {
        warn!("Map already over when submitting {}, resetting level", action.as_str_name());
    }

    fn on_level_lost(&mut self, _state: &MapState) {
        info!("Level lost, resetting");
    }

    fn on_level_won(&mut self, _state: &MapState) {
        info!("Level completed, moving to the next level");
    }

    fn on_new_level(&mut self, level: i32) {
        info!("Level changed to {}", level);
    }

    fn on_stopped(&mut self) {
        info!("Stop requested, leaving turn loop");
    }
}
