//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Round timing, streak and hint rules.
    #[serde(default)]
    pub game: GameConfig,
    /// Question bank location.
    #[serde(default)]
    pub questions: QuestionsConfig,
    /// Admin blocks granting privileged commands.
    #[serde(default)]
    pub admin: Vec<AdminBlock>,
    /// Logging output.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Round rules. All durations are in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Time budget for answering a question (default: 45).
    #[serde(default = "default_round_time")]
    pub round_time: f64,
    /// Pause between the end of a round and the next question (default: 10).
    /// A new session waits half of this.
    #[serde(default = "default_wait_time")]
    pub wait_time: f64,
    /// Accepted for compatibility with older config files. Not read by the engine.
    #[serde(default = "default_wait_time_extra")]
    pub wait_time_extra: f64,
    /// Stop after this long without chat (default: `round_time * 4`).
    #[serde(default)]
    pub inactivity_timeout: Option<f64>,
    /// Consecutive wins needed for a streak (default: 5).
    #[serde(default = "default_streak_steps")]
    pub streak_steps: u32,
    /// One more hint becomes available every `hint_timing` seconds (default: 10).
    #[serde(default = "default_hint_timing")]
    pub hint_timing: f64,
    /// Minimum spacing between two hints (default: 2.5).
    #[serde(default = "default_hint_cooldown")]
    pub hint_cooldown: f64,
    /// Hints per round (default: 3).
    #[serde(default = "default_hint_max")]
    pub hint_max: u8,
}

impl GameConfig {
    /// Effective inactivity timeout in seconds.
    pub fn inactivity_timeout(&self) -> f64 {
        self.inactivity_timeout.unwrap_or(self.round_time * 4.0)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_time: default_round_time(),
            wait_time: default_wait_time(),
            wait_time_extra: default_wait_time_extra(),
            inactivity_timeout: None,
            streak_steps: default_streak_steps(),
            hint_timing: default_hint_timing(),
            hint_cooldown: default_hint_cooldown(),
            hint_max: default_hint_max(),
        }
    }
}

/// Question bank configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsConfig {
    /// Path to a TOML file of `[[question]]` entries.
    #[serde(default = "default_questions_path")]
    pub path: String,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            path: default_questions_path(),
        }
    }
}

/// Admin block configuration.
///
/// ```toml
/// [[admin]]
/// name = "quizmaster"
/// commands = ["next", "stop", "unlock", "start"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBlock {
    /// Player name (matched case-insensitively).
    pub name: String,
    /// Permission level. Anything above zero may attempt admin commands.
    #[serde(default = "default_admin_level")]
    pub level: u8,
    /// Granted command names, or `"*"` for all of them.
    #[serde(default)]
    pub commands: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.game.round_time, 45.0);
        assert_eq!(config.game.wait_time, 10.0);
        assert_eq!(config.game.inactivity_timeout(), 180.0);
        assert_eq!(config.game.streak_steps, 5);
        assert_eq!(config.game.hint_max, 3);
        assert_eq!(config.questions.path, "questions.toml");
        assert!(config.admin.is_empty());
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[game]
round_time = 30.0
inactivity_timeout = 60.0

[questions]
path = "bank.toml"

[[admin]]
name = "quizmaster"
level = 2
commands = ["*"]

[log]
format = "json"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.game.round_time, 30.0);
        assert_eq!(config.game.inactivity_timeout(), 60.0);
        assert_eq!(config.game.hint_cooldown, 2.5);
        assert_eq!(config.questions.path, "bank.toml");
        assert_eq!(config.admin.len(), 1);
        assert_eq!(config.admin[0].level, 2);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/trivia.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
