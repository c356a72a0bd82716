//! Trivia actor event handlers.
//!
//! Each submodule handles a category of [`GameEvent`](super::GameEvent)
//! processed by [`TriviaActor`](super::TriviaActor).

pub mod admin;
pub mod chat;
pub mod hints;
pub mod lifecycle;
pub mod timers;
