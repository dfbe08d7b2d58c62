use crate::infra::Bounds;
use crate::state::{Map, MapState, ObstacleSet};

/// Per-level resources. Built on the first PLAYING observation of a level
/// and dropped on WON or LOST.
#[derive(Debug, Clone)]
pub struct EpisodeCache {
    map: Map,
    turns: u32,
}

impl EpisodeCache {
    pub fn new(state: &MapState, obstacles: ObstacleSet) -> Self {
        Self {
            map: Map::new(Bounds::new(state.width, state.height), obstacles),
            turns: 0,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn record_turn(&mut self) -> u32 {
        self.turns += 1;
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;

    #[test]
    fn test_bounds_come_from_state() {
        let state = MapState::playing(7, 3, Position::new(0, 0));
        let cache = EpisodeCache::new(&state, ObstacleSet::new());
        assert_eq!(cache.map().width(), 7);
        assert_eq!(cache.map().height(), 3);
        assert!(!cache.map().is_walkable(&Position::new(0, 3)));
    }

    #[test]
    fn test_turn_counter() {
        let state = MapState::playing(2, 2, Position::new(0, 0));
        let mut cache = EpisodeCache::new(&state, ObstacleSet::new());
        assert_eq!(cache.turns(), 0);
        assert_eq!(cache.record_turn(), 1);
        assert_eq!(cache.record_turn(), 2);
    }
}
