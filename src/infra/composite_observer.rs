use crate::infra::{Action, GameObserver};
use crate::planners::heuristic::Decision;
use crate::state::{Map, MapState};

pub struct CompositeObserver {
    observers: Vec<Box<dyn GameObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn GameObserver>>) -> Self {
        Self { observers }
    }
}

impl GameObserver for CompositeObserver {
    fn on_playthrough_start(&mut self, level: i32) {
        for observer in &mut self.observers {
            observer.on_playthrough_start(level);
        }
    }

    fn on_episode_start(&mut self, map: &Map) {
        for observer in &mut self.observers {
            observer.on_episode_start(map);
        }
    }

    fn on_state_update(&mut self, state: &MapState, turn: u32) {
        for observer in &mut self.observers {
            observer.on_state_update(state, turn);
        }
    }

    fn on_action_selected(&mut self, decision: &Decision, state: &MapState) {
        for observer in &mut self.observers {
            observer.on_action_selected(decision, state);
        }
    }

    fn on_map_already_over(&mut self, action: Action) {
        for observer in &mut self.observers {
            observer.on_map_already_over(action);
        }
    }

    fn on_level_lost(&mut self, state: &MapState) {
        for observer in &mut self.observers {
            observer.on_level_lost(state);
        }
    }

    fn on_level_won(&mut self, state: &MapState) {
        for observer in &mut self.observers {
            observer.on_level_won(state);
        }
    }

    fn on_new_level(&mut self, level: i32) {
        for observer in &mut self.observers {
            observer.on_new_level(level);
        }
    }

    fn on_stopped(&mut self) {
        for observer in &mut self.observers {
            observer.on_stopped();
        }
    }
}
