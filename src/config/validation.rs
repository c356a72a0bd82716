//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::handlers::AdminCommand;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("game.{0} must be a positive number of seconds, got {1}")]
    NonPositiveDuration(&'static str, f64),
    #[error("game.hint_cooldown must not be negative, got {0}")]
    NegativeCooldown(f64),
    #[error("game.streak_steps must be at least 1")]
    ZeroStreakSteps,
    #[error("game.hint_max must be at least 1")]
    ZeroHintMax,
    #[error("questions.path is required")]
    MissingQuestionsPath,
    #[error("admin.name is required")]
    MissingAdminName,
    #[error("admin '{0}' must have level 1 or higher")]
    ZeroAdminLevel(String),
    #[error("admin '{0}' grants unknown command '{1}'")]
    UnknownAdminCommand(String, String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let game = &config.game;

    // Timing
    for (name, value) in [
        ("round_time", game.round_time),
        ("wait_time", game.wait_time),
        ("hint_timing", game.hint_timing),
        ("inactivity_timeout", game.inactivity_timeout()),
    ] {
        if !(value.is_finite() && value > 0.0) {
            errors.push(ValidationError::NonPositiveDuration(name, value));
        }
    }
    if !(game.hint_cooldown.is_finite() && game.hint_cooldown >= 0.0) {
        errors.push(ValidationError::NegativeCooldown(game.hint_cooldown));
    }
    if game.streak_steps == 0 {
        errors.push(ValidationError::ZeroStreakSteps);
    }
    if game.hint_max == 0 {
        errors.push(ValidationError::ZeroHintMax);
    }

    if config.questions.path.trim().is_empty() {
        errors.push(ValidationError::MissingQuestionsPath);
    }

    // Admin blocks
    for block in &config.admin {
        if block.name.trim().is_empty() {
            errors.push(ValidationError::MissingAdminName);
            continue;
        }
        if block.level == 0 {
            errors.push(ValidationError::ZeroAdminLevel(block.name.clone()));
        }
        for command in &block.commands {
            if command != "*" && command.parse::<AdminCommand>().is_err() {
                errors.push(ValidationError::UnknownAdminCommand(
                    block.name.clone(),
                    command.clone(),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminBlock;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.game.round_time = 0.0;
        config.game.hint_cooldown = -1.0;
        config.game.streak_steps = 0;
        config.game.hint_max = 0;
        config.questions.path = " ".into();
        config.admin.push(AdminBlock {
            name: "mallory".into(),
            level: 0,
            commands: vec!["kick".into(), "*".into(), "stop".into()],
        });

        let errors = validate(&config).unwrap_err();
        // round_time, and inactivity_timeout derived from it
        let durations = errors
            .iter()
            .filter(|e| matches!(e, ValidationError::NonPositiveDuration(..)))
            .count();
        assert_eq!(durations, 2);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::NegativeCooldown(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroStreakSteps)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroHintMax)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingQuestionsPath)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroAdminLevel(_))));
        assert!(errors.iter().any(
            |e| matches!(e, ValidationError::UnknownAdminCommand(_, cmd) if cmd == "kick")
        ));
    }
}
