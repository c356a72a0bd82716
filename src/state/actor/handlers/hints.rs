//! Hint release.

use crate::state::TriviaActor;
use crate::state::round::Phase;
use tokio::time::Instant;
use tracing::{debug, trace};

impl TriviaActor {
    /// Release the next hint if the schedule and cooldown allow it.
    pub(crate) fn release_hint(&mut self) {
        if self.state.phase != Phase::Question {
            return;
        }

        let now = Instant::now();
        let Some(count) =
            self.state
                .hints
                .next_release(now, self.state.timer_start, &self.rules.hints)
        else {
            trace!(count = self.state.hints.count, "No hint available yet");
            return;
        };
        let Some(round) = self.state.current_round.as_ref() else {
            return;
        };

        let text = round.question.hint(count);
        debug!(round_id = round.id, count, hint = %text, "Hint released");
        self.state.hints.record(count, text, now);

        crate::metrics::record_hint();
        self.broadcast_info();
    }
}
