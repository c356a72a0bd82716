//! Round lifecycle: session start, round start, solve, timeout and stop.
//!
//! Every phase change goes through [`TriviaActor::arm`] or
//! [`TriviaActor::stop_game`], both of which cancel the outstanding timer
//! first. That keeps at most one timer alive at any time.

use crate::fanout::Outbound;
use crate::players::Player;
use crate::state::info::RoundInfo;
use crate::state::round::Phase;
use crate::state::timer::TimerKind;
use crate::state::TriviaActor;
use crate::store::{RoundId, Solver, StoreError};
use chrono::Utc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

const INACTIVITY_NOTICE: &str = "Stopping due to inactivity!";
pub(crate) const ADMIN_STOP_NOTICE: &str = "Stopped by administrator.";
const NO_QUESTIONS_NOTICE: &str = "Trivia stopped: no questions available.";

impl TriviaActor {
    /// Replace the outstanding timer with a fresh one.
    pub(crate) fn arm(&mut self, delay: Duration, kind: TimerKind) {
        self.state.disarm();
        let handle = self.scheduler.schedule(delay, kind);
        self.state.timer_start = Instant::now();
        self.state.timer_length = delay;
        self.state.install_timer(handle);
    }

    /// Begin a session: short pause, fresh streak, fresh question chain.
    pub(crate) fn begin_session(&mut self) {
        let wait = self.rules.wait_time / 2;
        self.state.phase = Phase::Waiting;
        self.state.reset_round();
        self.state.chain_start = Utc::now();
        self.state.streak.reset();
        self.arm(wait, TimerKind::NextRound);

        info!(wait = ?wait, "Trivia session starting");
        self.announce(format!("New round starting in {:.2}s!", wait.as_secs_f64()));
        self.broadcast_info();
    }

    /// The pause between rounds is over.
    pub(crate) async fn on_next_round_timer(&mut self) {
        let idle = Instant::now().saturating_duration_since(self.state.last_activity);
        if self.state.player_count < 1 || idle > self.rules.inactivity_timeout {
            info!(players = self.state.player_count, idle = ?idle, "No activity, stopping game");
            self.stop_game(None, false);
        } else {
            self.start_new_round().await;
        }
    }

    pub(crate) async fn start_new_round(&mut self) {
        self.state.disarm();

        let first = self.store.new_round(self.state.chain_start).await;
        let created = match first {
            Err(StoreError::Exhausted(since)) => {
                debug!(%since, "Every question asked, starting a new chain");
                self.state.chain_start = Utc::now();
                self.store.new_round(self.state.chain_start).await
            }
            other => other,
        };

        let round = match created {
            Ok(round) => round,
            Err(e) => {
                error!(error = %e, "Failed to create round");
                self.stop_game(Some(NO_QUESTIONS_NOTICE), false);
                return;
            }
        };

        let round_id = round.id;
        info!(round_id, question_id = round.question.id, "Round started");
        self.state.current_round = Some(round);
        self.state.hints.reset();
        self.state.phase = Phase::Question;
        let round_time = self.rules.round_time;
        self.arm(round_time, TimerKind::RoundTimeout { round_id });

        crate::metrics::record_round_started();
        self.broadcast_info();
    }

    /// `player` answered the live question.
    pub(crate) async fn round_solved(&mut self, player: &Player) {
        let Some(round_id) = self.state.round_id() else {
            return;
        };
        // The round timer must not fire into a solved round.
        self.state.disarm();
        self.state.phase = Phase::Waiting;

        let time_taken = Instant::now()
            .saturating_duration_since(self.state.timer_start)
            .as_secs_f64();
        let solver = Solver {
            id: player.id,
            name: player.name.clone(),
        };
        if let Some(event) = self.state.streak.record_win(&solver, self.rules.streak_steps) {
            self.announce(event.to_string());
        }
        let hints = self.state.hints.count;
        let streak = self.state.streak.count;

        let recorded = match self
            .store
            .solved_by(round_id, &solver, time_taken, hints, streak)
            .await
        {
            Ok(_) => self.store.end_round(round_id).await,
            Err(e) => Err(e),
        };
        match recorded {
            Ok(record) => self.state.current_round = Some(record),
            Err(e) => {
                warn!(round_id, error = %e, "Failed to record solved round");
                if let Some(round) = self.state.current_round.as_mut() {
                    round.record_solve(solver, time_taken, hints, streak);
                    round.end(Utc::now());
                }
            }
        }

        info!(round_id, solver = %player.name, time_taken, hints, streak, "Round solved");
        crate::metrics::record_round_solved(time_taken);
        self.round_end();
    }

    /// Nobody answered in time.
    pub(crate) async fn on_round_timeout(&mut self, round_id: RoundId) {
        match self.store.end_round(round_id).await {
            Ok(record) => self.state.current_round = Some(record),
            Err(e) => {
                warn!(round_id, error = %e, "Failed to end round");
                if let Some(round) = self.state.current_round.as_mut() {
                    round.end(Utc::now());
                }
            }
        }

        info!(round_id, "Round timed out");
        crate::metrics::record_round_timed_out();
        self.round_end();
    }

    fn round_end(&mut self) {
        self.state.phase = Phase::Waiting;
        let wait = self.rules.wait_time;
        self.arm(wait, TimerKind::NextRound);
        self.broadcast_info();
    }

    /// Skip the pause and ask the next question now.
    ///
    /// Only valid while waiting on a pending timer.
    pub(crate) async fn next_round(&mut self) -> bool {
        if self.state.phase != Phase::Waiting || !self.state.disarm() {
            return false;
        }
        self.start_new_round().await;
        true
    }

    /// Stop the game no matter what. Without a reason the stop is announced
    /// as an inactivity stop.
    pub(crate) fn stop_game(&mut self, reason: Option<&str>, lock: bool) {
        self.state.disarm();
        self.state.reset_round();
        self.state.timer_length = Duration::ZERO;
        self.state.phase = if lock { Phase::Locked } else { Phase::Idle };

        let reason = reason.unwrap_or(INACTIVITY_NOTICE);
        info!(phase = %self.state.phase, reason, "Trivia stopped");
        self.announce(reason);
        self.broadcast_info();
    }

    pub(crate) fn announce(&self, text: impl Into<String>) {
        self.fanout.publish(Outbound::System(text.into()));
    }

    pub(crate) fn broadcast_info(&self) {
        let info = RoundInfo::project(&self.state.snapshot(), Instant::now());
        self.fanout.publish(Outbound::SetInfo(info));
    }
}
