//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Round Timing Defaults (seconds)
// =============================================================================

pub fn default_round_time() -> f64 {
    45.0
}

pub fn default_wait_time() -> f64 {
    10.0
}

pub fn default_wait_time_extra() -> f64 {
    7.0
}

// =============================================================================
// Streak and Hint Defaults
// =============================================================================

pub fn default_streak_steps() -> u32 {
    5
}

pub fn default_hint_timing() -> f64 {
    10.0
}

pub fn default_hint_cooldown() -> f64 {
    2.5
}

pub fn default_hint_max() -> u8 {
    3
}

// =============================================================================
// Misc Defaults
// =============================================================================

pub fn default_questions_path() -> String {
    "questions.toml".to_string()
}

pub fn default_admin_level() -> u8 {
    1
}

pub fn default_log_filter() -> String {
    "info".to_string()
}
