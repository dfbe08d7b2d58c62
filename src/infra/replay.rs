use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use time::{OffsetDateTime, format_description};
use tracing::warn;

use crate::infra::{Action, GameObserver};
use crate::planners::heuristic::Decision;
use crate::state::{Map, MapState};

/// Turn journal: one JSON object per line for every observed event.
pub struct ReplayObserver {
    file: File,
    path: PathBuf,
    level: Option<i32>,
}

impl ReplayObserver {
    pub fn new(replays_folder: &Path) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let format = format_description::parse("[year][month][day]-[hour][minute][second]")
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let date_time_str = now
            .format(&format)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if !replays_folder.exists() {
            std::fs::create_dir_all(replays_folder)?;
        }
        let path = replays_folder.join(format!("pony-panic - {}.jsonl", date_time_str));
        let file = File::create(&path)?;

        Ok(Self {
            file,
            path,
            level: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, event: &str, mut record: Value) {
        if let Value::Object(fields) = &mut record {
            fields.insert("event".to_string(), json!(event));
            fields.insert("level".to_string(), json!(self.level));
        }
        if let Err(e) = self.write_line(&record) {
            warn!("Failed to write replay {}: {}", self.path.display(), e);
        }
    }

    fn write_line(&mut self, record: &Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.file, record)?;
        self.file.write_all(b"\n")?;
        self.file.flush()
    }
}

impl GameObserver for ReplayObserver {
    fn on_playthrough_start(&mut self, level: i32) {
        self.level = Some(level);
        self.append("playthrough_start", json!({}));
    }

    fn on_episode_start(&mut self, map: &Map) {
        let obstacles: Vec<_> = map.obstacles().iter().collect();
        self.append(
            "episode_start",
            json!({ "width": map.width(), "height": map.height(), "obstacles": obstacles }),
        );
    }

    fn on_state_update(&mut self, state: &MapState, turn: u32) {
        self.append(
            "state",
            json!({
                "turn": turn,
                "hero": state.hero,
                "enemies": state.enemy_positions(),
                "bullets": state.bullet_positions(),
                "treasures": state.uncollected_treasures().map(|t| t.position).collect::<Vec<_>>(),
            }),
        );
    }

    fn on_action_selected(&mut self, decision: &Decision, _state: &MapState) {
        self.append(
            "action",
            json!({ "goal": decision.goal.name(), "action": decision.action }),
        );
    }

    fn on_map_already_over(&mut self, action: Action) {
        self.append("map_already_over", json!({ "action": action }));
    }

    fn on_level_lost(&mut self, _state: &MapState) {
        self.append("lost", json!({}));
    }

    fn on_level_won(&mut self, _state: &MapState) {
        self.append("won", json!({}));
    }

    fn on_new_level(&mut self, level: i32) {
        self.level = Some(level);
        self.append("new_level", json!({}));
    }

    fn on_stopped(&mut self) {
        self.append("stopped", json!({}));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;
    use crate::planners::heuristic::Goal;

    #[test]
    fn test_replay_lines_are_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut replay = ReplayObserver::new(&dir.path().join("replays")).unwrap();
        let state = MapState::playing(4, 4, Position::new(1, 2));

        replay.on_playthrough_start(3);
        replay.on_state_update(&state, 1);
        replay.on_action_selected(
            &Decision {
                goal: Goal::Wait,
                action: Action::Nothing,
            },
            &state,
        );

        let contents = std::fs::read_to_string(replay.path()).unwrap();
        let lines: Vec<Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "playthrough_start");
        assert_eq!(lines[1]["hero"]["x"], 1);
        assert_eq!(lines[1]["level"], 3);
        assert_eq!(lines[2]["action"], "NOTHING");
    }
}
