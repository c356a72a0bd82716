//! Inbound chat handling.
//!
//! - [`dispatch`]: classifies chat lines into engine intents
//! - [`admin`]: the closed set of privileged commands and their permission check

pub mod admin;
pub mod dispatch;

pub use admin::{AdminCommand, AdminOrder, authorize};
pub use dispatch::{ChatIntent, classify};
