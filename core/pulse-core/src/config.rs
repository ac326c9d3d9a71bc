//! Environment configuration and on-disk paths.
//!
//! All Pulse state lives under `~/.claude/pulse`: the task database and the
//! rotating log directory.

use std::env;
use std::path::PathBuf;

use crate::error::{PulseError, Result};

pub const DEFAULT_SOUND: &str = "Glass";
pub const DEFAULT_EDITOR: &str = "zed";

/// Per-invocation configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Notification sound used where no rule overrides it.
    pub sound: String,
    /// Editor identifier used to build the click-to-open command.
    pub editor: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            sound: env_or("NOTIFICATION_SOUND", DEFAULT_SOUND),
            editor: env_or("NOTIFICATION_EDITOR", DEFAULT_EDITOR),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound: DEFAULT_SOUND.to_string(),
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the Pulse data directory (~/.claude/pulse).
pub fn data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".claude").join("pulse"))
        .ok_or(PulseError::HomeDirNotFound)
}

/// Returns the path to the task database.
pub fn db_path() -> Result<PathBuf> {
    data_dir().map(|dir| dir.join("tasks.db"))
}

/// Returns the directory holding rotated log files.
pub fn log_dir() -> Result<PathBuf> {
    data_dir().map(|dir| dir.join("log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_values() {
        let config = Config::default();
        assert_eq!(config.sound, "Glass");
        assert_eq!(config.editor, "zed");
    }

    #[test]
    fn db_path_lives_under_data_dir() {
        let db = db_path().expect("db path");
        let dir = data_dir().expect("data dir");
        assert!(db.starts_with(&dir));
        assert_eq!(db.file_name().and_then(|n| n.to_str()), Some("tasks.db"));
    }
}
