use tracing::debug;

use crate::infra::{Action, Position, StepError, path_to_action};
use crate::planners::heuristic::pathfinding::{HeuristicMode, find_path};
use crate::planners::heuristic::threat::{ThreatAssessor, is_bullet_threatening, kick_direction_to};
use crate::state::{Map, MapState};

/// Enemies within this Manhattan distance get kicked.
const KICK_RANGE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    KickEnemy(Position),
    RaiseShield(Position),
    CollectTreasure(Position),
    Wait,
}

impl Goal {
    pub fn name(&self) -> &'static str {
        match self {
            Goal::KickEnemy(_) => "KickEnemy",
            Goal::RaiseShield(_) => "RaiseShield",
            Goal::CollectTreasure(_) => "CollectTreasure",
            Goal::Wait => "Wait",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub goal: Goal,
    pub action: Action,
}

impl Decision {
    fn wait() -> Self {
        Self {
            goal: Goal::Wait,
            action: Action::Nothing,
        }
    }
}

/// Strict-priority policy: kick, shield, collect, wait.
pub struct ActionSelector<'a> {
    map: &'a Map,
    mode: HeuristicMode,
}

impl<'a> ActionSelector<'a> {
    pub fn new(map: &'a Map, mode: HeuristicMode) -> Self {
        Self { map, mode }
    }

    #[tracing::instrument(level = "debug", skip(self, state), fields(hero_x = state.hero.x, hero_y = state.hero.y))]
    pub fn select(&self, state: &MapState) -> Result<Decision, StepError> {
        let hero = state.hero;

        // First listed enemy in range wins, not the nearest.
        let kick_target = state.enemies.iter().find(|enemy| {
            let distance = hero.distance(&enemy.position);
            enemy.is_alive() && distance > 0 && distance <= KICK_RANGE
        });
        if let Some(enemy) = kick_target
            && let Some(direction) = kick_direction_to(hero, enemy.position)
        {
            debug!("Enemy at {:?} in kick range", enemy.position);
            return Ok(Decision {
                goal: Goal::KickEnemy(enemy.position),
                action: direction.kick_action(),
            });
        }

        if let Some(bullet) = state
            .bullets
            .iter()
            .find(|bullet| is_bullet_threatening(hero, bullet.position))
        {
            debug!("Bullet at {:?} hits next tick", bullet.position);
            return Ok(Decision {
                goal: Goal::RaiseShield(bullet.position),
                action: Action::UseShield,
            });
        }

        // min_by_key keeps the first of equally near treasures.
        let Some(treasure) = state
            .uncollected_treasures()
            .min_by_key(|t| hero.distance(&t.position))
        else {
            debug!("No treasures left, waiting");
            return Ok(Decision::wait());
        };

        let threats = ThreatAssessor::new(state.enemy_positions(), state.bullet_positions());
        let Some(path) = find_path(self.map, hero, treasure.position, self.mode, &threats) else {
            debug!("Treasure at {:?} unreachable, waiting", treasure.position);
            return Ok(Decision::wait());
        };
        debug!("Path to treasure at {:?}: {} steps", treasure.position, path.len());

        let action = path_to_action(hero, &path)?.unwrap_or(Action::Nothing);
        Ok(Decision {
            goal: Goal::CollectTreasure(treasure.position),
            action,
        })
    }
}
