//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, GameConfig, AdminBlock)
//! - [`defaults`]: serde default values
//! - [`validation`]: startup checks

mod defaults;
mod types;
pub mod validation;

pub use types::{AdminBlock, Config, ConfigError, GameConfig, LogConfig, LogFormat, QuestionsConfig};
