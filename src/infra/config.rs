use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::planners::heuristic::HeuristicMode;

pub const DEFAULT_BASE_URL: &str = "https://ponypanic.io/playGameApi/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Session settings. Only the service adapter and `main` read these; the
/// decision engine never sees the token or URL.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
    pub heuristic: HeuristicMode,
    pub replays_folder: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("PONY_PANIC_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("PONY_PANIC_TOKEN"))?;

        let base_url = lookup("PONY_PANIC_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = match lookup("PONY_PANIC_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    key: "PONY_PANIC_TIMEOUT_SECS",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let heuristic = match lookup("PONY_PANIC_HEURISTIC") {
            Some(value) => value.parse::<HeuristicMode>().map_err(|reason| ConfigError::Invalid {
                key: "PONY_PANIC_HEURISTIC",
                value: value.clone(),
                reason,
            })?,
            None => HeuristicMode::default(),
        };

        let replays_folder = lookup("PONY_PANIC_REPLAYS_FOLDER")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            base_url,
            token,
            timeout,
            heuristic,
            replays_folder,
        })
    }
}
