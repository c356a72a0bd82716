//! Error types shared across the engine.
//!
//! Nothing here is ever surfaced to chat participants. Admin failures are
//! logged and counted, engine errors only reach callers of [`GameHandle`].
//!
//! [`GameHandle`]: crate::state::GameHandle

use crate::players::PlayerId;
use thiserror::Error;

// ============================================================================
// Admin Errors (privileged commands)
// ============================================================================

/// Reasons an admin command is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("unknown admin command: {0}")]
    UnknownCommand(String),

    #[error("unknown player #{0}")]
    UnknownPlayer(PlayerId),

    #[error("{player} has no access to: {command}")]
    Unauthorized {
        player: String,
        command: &'static str,
    },

    #[error("{command} is not valid while {phase}")]
    InvalidPhase {
        command: &'static str,
        phase: &'static str,
    },
}

impl AdminError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::UnknownPlayer(_) => "unknown_player",
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidPhase { .. } => "invalid_phase",
        }
    }
}

// ============================================================================
// Engine Errors (handle side)
// ============================================================================

/// Failures talking to the engine task.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("trivia engine has shut down")]
    Closed,

    #[error("trivia engine dropped the reply")]
    NoReply(#[from] tokio::sync::oneshot::error::RecvError),
}
