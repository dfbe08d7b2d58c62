use serde::{Deserialize, Serialize};

use crate::infra::Position;
use crate::state::ObstacleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MapStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enemy {
    pub position: Position,
    pub health: i32,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treasure {
    pub position: Position,
    pub collected_by: Option<String>,
}

impl Treasure {
    pub fn is_collected(&self) -> bool {
        self.collected_by.is_some()
    }
}

/// Snapshot of the level as observed at the start of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapState {
    pub status: MapStatus,
    pub width: i32,
    pub height: i32,
    pub hero: Position,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub treasures: Vec<Treasure>,
}

impl MapState {
    /// A playing state with the hero at `hero` and nothing else on a
    /// `width` x `height` map.
    pub fn playing(width: i32, height: i32, hero: Position) -> Self {
        Self {
            status: MapStatus::Playing,
            width,
            height,
            hero,
            enemies: Vec::new(),
            bullets: Vec::new(),
            treasures: Vec::new(),
        }
    }

    pub fn uncollected_treasures(&self) -> impl Iterator<Item = &Treasure> {
        self.treasures.iter().filter(|t| !t.is_collected())
    }

    pub fn enemy_positions(&self) -> Vec<Position> {
        self.enemies.iter().map(|e| e.position).collect()
    }

    pub fn bullet_positions(&self) -> Vec<Position> {
        self.bullets.iter().map(|b| b.position).collect()
    }
}

/// Static level data, fetched once per episode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapResources {
    pub obstacles: ObstacleSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaythroughState {
    pub current_level: i32,
}
