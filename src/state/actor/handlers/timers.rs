//! Timer firing handling.

use crate::state::TriviaActor;
use crate::state::round::Phase;
use crate::state::timer::{TimerFired, TimerKind};
use tracing::debug;

impl TriviaActor {
    pub(crate) async fn handle_timer(&mut self, fired: TimerFired) {
        if !self.state.is_current(&fired) || !self.timer_applies(fired.kind) {
            debug!(
                epoch = fired.epoch,
                kind = ?fired.kind,
                phase = %self.state.phase,
                "Ignoring stale timer"
            );
            crate::metrics::record_stale_timer();
            return;
        }

        // Fired on its own; nothing left to abort.
        self.state.take_timer();

        match fired.kind {
            TimerKind::RoundTimeout { round_id } => self.on_round_timeout(round_id).await,
            TimerKind::NextRound => self.on_next_round_timer().await,
        }
    }

    fn timer_applies(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::RoundTimeout { round_id } => {
                self.state.phase == Phase::Question && self.state.round_id() == Some(round_id)
            }
            TimerKind::NextRound => self.state.phase == Phase::Waiting,
        }
    }
}
