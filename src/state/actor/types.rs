use crate::players::{Player, PlayerId};
use crate::state::round::{Phase, StreakState};
use crate::state::timer::{TimerFired, TimerKind};
use crate::store::RoundRecord;
use tokio::sync::oneshot;

/// Events that can be sent to the trivia engine.
#[derive(Debug)]
pub enum GameEvent {
    /// A chat line from a participant.
    Chat { player: Player, text: String },
    /// An admin command issued outside of chat.
    Admin {
        player_id: PlayerId,
        command: String,
        args: Vec<String>,
    },
    /// Number of connected participants changed.
    PlayerCount(usize),
    /// A scheduled timer expired.
    TimerFired(TimerFired),
    /// Read a consistent view of the engine state.
    Inspect {
        reply_tx: oneshot::Sender<StateView>,
    },
    /// Stop processing and cancel the outstanding timer.
    Shutdown,
}

impl From<TimerFired> for GameEvent {
    fn from(fired: TimerFired) -> Self {
        Self::TimerFired(fired)
    }
}

/// Point-in-time copy of the engine state, for diagnostics and tests.
#[derive(Debug, Clone)]
pub struct StateView {
    pub phase: Phase,
    pub round: Option<RoundRecord>,
    pub hint_count: u8,
    pub hint: Option<String>,
    pub streak: StreakState,
    pub player_count: usize,
    /// Kind of the outstanding timer, if one is armed.
    pub timer: Option<TimerKind>,
    pub epoch: Option<u64>,
    /// Result of the phase/round/timer consistency check.
    pub invariants_hold: bool,
}
