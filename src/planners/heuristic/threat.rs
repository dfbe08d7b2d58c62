//! Proximity scoring of enemies and bullets around the hero.

use crate::infra::{Direction, Position};

const ENEMY_WEIGHT: f64 = 10.0;
const BULLET_WEIGHT: f64 = 5.0;

/// Enemy and bullet positions seen this turn.
#[derive(Debug, Clone, Default)]
pub struct ThreatAssessor {
    enemies: Vec<Position>,
    bullets: Vec<Position>,
}

impl ThreatAssessor {
    pub fn new(enemies: Vec<Position>, bullets: Vec<Position>) -> Self {
        Self { enemies, bullets }
    }

    /// `10 / (d_enemy + 1) + 5 / (d_bullet + 1)` with d the Manhattan distance
    /// to the nearest entity of each kind. A kind with no entities adds 0.
    pub fn proximity_cost(&self, pos: &Position) -> f64 {
        proximity_term(pos, &self.enemies, ENEMY_WEIGHT)
            + proximity_term(pos, &self.bullets, BULLET_WEIGHT)
    }
}

fn proximity_term(pos: &Position, entities: &[Position], weight: f64) -> f64 {
    entities
        .iter()
        .map(|e| pos.distance(e))
        .min()
        .map_or(0.0, |d| weight / f64::from(d + 1))
}

/// True when the bullet sits exactly one orthogonal step from the hero.
pub fn is_bullet_threatening(hero: Position, bullet: Position) -> bool {
    let dx = (bullet.x - hero.x).abs();
    let dy = (bullet.y - hero.y).abs();
    (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
}

/// Direction to kick at `enemy`, horizontal axis first. `None` when the
/// positions coincide.
pub fn kick_direction_to(hero: Position, enemy: Position) -> Option<Direction> {
    if enemy.x > hero.x {
        Some(Direction::Right)
    } else if enemy.x < hero.x {
        Some(Direction::Left)
    } else if enemy.y > hero.y {
        Some(Direction::Up)
    } else if enemy.y < hero.y {
        Some(Direction::Down)
    } else {
        None
    }
}
