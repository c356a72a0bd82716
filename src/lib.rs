//! trivia-ng - timed trivia rounds for shared chat audiences.
//!
//! The engine runs a continuous question / reveal / wait loop without a
//! moderator. Chat text and timer expiries are funneled through a single
//! actor task that owns the round state, so every phase transition is
//! serialized.
//!
//! Collaborators live behind traits:
//! - [`store::RoundStore`]: round records and the question bank
//! - [`players::PlayerDirectory`]: identity and admin permissions
//! - [`fanout::Fanout`]: outbound notifications

pub mod config;
pub mod error;
pub mod fanout;
pub mod handlers;
pub mod metrics;
pub mod players;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use fanout::{BroadcastFanout, Fanout, Outbound};
pub use players::{Player, PlayerDirectory, StaticDirectory};
pub use state::{GameHandle, GameRules, Phase, RoundInfo, TriviaActor};
pub use store::{MemoryStore, Question, RoundStore};
