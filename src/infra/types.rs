use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Orthogonal neighbours in search order: +x, -x, +y, -y.
    pub fn neighbors(&self) -> [Position; 4] {
        [
            Position::new(self.x + 1, self.y), // Right
            Position::new(self.x - 1, self.y), // Left
            Position::new(self.x, self.y + 1), // Up
            Position::new(self.x, self.y - 1), // Down
        ]
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }
}

/// Playable area of one level. Valid coordinates satisfy
/// `0 <= x < width` and `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
        }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn move_action(self) -> Action {
        match self {
            Direction::Up => Action::MoveUp,
            Direction::Down => Action::MoveDown,
            Direction::Left => Action::MoveLeft,
            Direction::Right => Action::MoveRight,
        }
    }

    pub fn kick_action(self) -> Action {
        match self {
            Direction::Up => Action::KickUp,
            Direction::Down => Action::KickDown,
            Direction::Left => Action::KickLeft,
            Direction::Right => Action::KickRight,
        }
    }
}

/// One hero action per turn, as accepted by `approveHeroTurn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    KickUp,
    KickDown,
    KickLeft,
    KickRight,
    UseShield,
    Nothing,
}

impl Action {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Action::MoveUp => "MOVE_UP",
            Action::MoveDown => "MOVE_DOWN",
            Action::MoveLeft => "MOVE_LEFT",
            Action::MoveRight => "MOVE_RIGHT",
            Action::KickUp => "KICK_UP",
            Action::KickDown => "KICK_DOWN",
            Action::KickLeft => "KICK_LEFT",
            Action::KickRight => "KICK_RIGHT",
            Action::UseShield => "USE_SHIELD",
            Action::Nothing => "NOTHING",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_order() {
        let pos = Position::new(3, 3);
        assert_eq!(
            pos.neighbors(),
            [
                Position::new(4, 3),
                Position::new(2, 3),
                Position::new(3, 4),
                Position::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(3, 2);
        assert!(bounds.contains(&Position::new(0, 0)));
        assert!(bounds.contains(&Position::new(2, 1)));
        assert!(!bounds.contains(&Position::new(3, 1)));
        assert!(!bounds.contains(&Position::new(2, 2)));
        assert!(!bounds.contains(&Position::new(-1, 0)));
    }

    #[test]
    fn test_action_wire_names_match_serde() {
        let all = [
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::KickUp,
            Action::KickDown,
            Action::KickLeft,
            Action::KickRight,
            Action::UseShield,
            Action::Nothing,
        ];
        for action in all {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str_name()));
        }
    }
}
