use std::collections::{HashMap, HashSet};

use crate::infra::{Bounds, Position};

/// Blocked cells of one level, keyed by x-coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObstacleSet {
    columns: HashMap<i32, HashSet<i32>>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: Position) -> bool {
        self.columns.entry(pos.x).or_default().insert(pos.y)
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.columns
            .get(&pos.x)
            .is_some_and(|column| column.contains(&pos.y))
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.columns
            .iter()
            .flat_map(|(&x, ys)| ys.iter().map(move |&y| Position::new(x, y)))
    }
}

impl FromIterator<Position> for ObstacleSet {
    fn from_iter<T: IntoIterator<Item = Position>>(iter: T) -> Self {
        let mut set = ObstacleSet::new();
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

impl From<HashMap<i32, HashSet<i32>>> for ObstacleSet {
    fn from(columns: HashMap<i32, HashSet<i32>>) -> Self {
        Self { columns }
    }
}

/// Static walkability grid of the current level. Never mutated after
/// construction; a new level gets a new `Map`.
#[derive(Debug, Clone)]
pub struct Map {
    bounds: Bounds,
    obstacles: ObstacleSet,
}

impl Map {
    pub fn new(bounds: Bounds, obstacles: ObstacleSet) -> Self {
        Self { bounds, obstacles }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn is_walkable(&self, pos: &Position) -> bool {
        self.bounds.contains(pos) && !self.obstacles.contains(pos)
    }

    /// Walkable orthogonal neighbours, in the fixed order +x, -x, +y, -y.
    pub fn neighbors(&self, pos: &Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors()
            .into_iter()
            .filter(move |neighbor| self.is_walkable(neighbor))
    }
}
