//! Round state owned by the engine actor.

use super::info::Snapshot;
use super::timer::{TimerFired, TimerHandle, TimerKind};
use crate::config::GameConfig;
use crate::players::PlayerId;
use crate::store::{RoundId, RoundRecord, Solver};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Coarse state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No round active. A player may say `!start`.
    Idle,
    /// A question is live and answers are checked.
    Question,
    /// Between rounds, or about to begin a session.
    Waiting,
    /// Halted by an administrator.
    Locked,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Question => "question",
            Self::Waiting => "waiting",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Rules
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HintRules {
    /// One more hint becomes available per `timing` of round time.
    pub timing: Duration,
    pub cooldown: Duration,
    pub max: u8,
}

/// Timing and streak rules resolved from [`GameConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    pub round_time: Duration,
    pub wait_time: Duration,
    pub inactivity_timeout: Duration,
    pub streak_steps: u32,
    pub hints: HintRules,
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

impl From<&GameConfig> for GameRules {
    fn from(game: &GameConfig) -> Self {
        Self {
            round_time: secs(game.round_time),
            wait_time: secs(game.wait_time),
            inactivity_timeout: secs(game.inactivity_timeout()),
            streak_steps: game.streak_steps.max(1),
            hints: HintRules {
                timing: secs(game.hint_timing),
                cooldown: secs(game.hint_cooldown),
                max: game.hint_max,
            },
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

// ============================================================================
// Hints
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintState {
    pub count: u8,
    pub current: Option<String>,
    pub last_release: Option<Instant>,
}

impl HintState {
    /// The hint number that may be released at `now`, if any.
    ///
    /// At most one hint is granted per call, even when the schedule owes
    /// several.
    pub fn next_release(&self, now: Instant, round_start: Instant, rules: &HintRules) -> Option<u8> {
        if self.count >= rules.max {
            return None;
        }
        if let Some(last) = self.last_release
            && now.saturating_duration_since(last) < rules.cooldown
        {
            return None;
        }

        let elapsed = now.saturating_duration_since(round_start).as_secs_f64();
        let timing = rules.timing.as_secs_f64();
        if timing <= 0.0 {
            return None;
        }
        let allowed = (elapsed / timing).ceil();
        (allowed > f64::from(self.count)).then_some(self.count + 1)
    }

    pub fn record(&mut self, count: u8, text: String, now: Instant) {
        self.count = count;
        self.current = Some(text);
        self.last_release = Some(now);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Streaks
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakState {
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub count: u32,
}

/// Something worth announcing after a win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakEvent {
    Reached {
        player: String,
        count: u32,
        can_skip: bool,
    },
    Broken {
        breaker: String,
        holder: String,
        count: u32,
    },
}

impl fmt::Display for StreakEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reached {
                player,
                count,
                can_skip,
            } => {
                write!(f, "{} has reached a streak of {}!", player, count)?;
                if *can_skip {
                    f.write_str(" You can skip to the next round with !next.")?;
                }
                Ok(())
            }
            Self::Broken {
                breaker,
                holder,
                count,
            } => write!(f, "{} broke {}'s streak of {}!", breaker, holder, count),
        }
    }
}

impl StreakState {
    /// Count a win for `winner`.
    pub fn record_win(&mut self, winner: &Solver, steps: u32) -> Option<StreakEvent> {
        if self.player_id == Some(winner.id) {
            self.count += 1;
            self.player_name = Some(winner.name.clone());
            return (steps > 0 && self.count % steps == 0).then(|| StreakEvent::Reached {
                player: winner.name.clone(),
                count: self.count,
                can_skip: self.count == steps,
            });
        }

        let broken = (self.count > steps).then(|| StreakEvent::Broken {
            breaker: winner.name.clone(),
            holder: self.player_name.clone().unwrap_or_default(),
            count: self.count,
        });
        *self = Self {
            player_id: Some(winner.id),
            player_name: Some(winner.name.clone()),
            count: 1,
        };
        broken
    }

    /// True if `player_id` holds a streak long enough to skip the wait.
    pub fn held_by(&self, player_id: PlayerId, steps: u32) -> bool {
        self.player_id == Some(player_id) && self.count >= steps
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Round State
// ============================================================================

/// Everything the engine knows about the running game.
#[derive(Debug)]
pub struct RoundState {
    pub phase: Phase,
    /// Live round in Question, the round just ended in Waiting.
    pub current_round: Option<RoundRecord>,
    active_timer: Option<TimerHandle>,
    pub hints: HintState,
    pub streak: StreakState,
    pub player_count: usize,
    pub last_activity: Instant,
    /// Start of the running timer. In Question this is the round start.
    pub timer_start: Instant,
    pub timer_length: Duration,
    /// Questions asked since this instant are not repeated.
    pub chain_start: DateTime<Utc>,
}

impl RoundState {
    pub fn new(now: Instant) -> Self {
        Self {
            phase: Phase::Idle,
            current_round: None,
            active_timer: None,
            hints: HintState::default(),
            streak: StreakState::default(),
            player_count: 0,
            last_activity: now,
            timer_start: now,
            timer_length: Duration::ZERO,
            chain_start: Utc::now(),
        }
    }

    pub fn round_id(&self) -> Option<RoundId> {
        self.current_round.as_ref().map(|r| r.id)
    }

    pub fn timer(&self) -> Option<&TimerHandle> {
        self.active_timer.as_ref()
    }

    /// Store a freshly armed timer. The previous one must already be disarmed.
    pub fn install_timer(&mut self, handle: TimerHandle) {
        debug_assert!(self.active_timer.is_none(), "timer armed over a pending one");
        if let Some(old) = self.active_timer.replace(handle) {
            old.cancel();
        }
    }

    /// Cancel the outstanding timer. Returns whether there was one.
    pub fn disarm(&mut self) -> bool {
        match self.active_timer.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Forget the timer that just fired, without aborting it.
    pub fn take_timer(&mut self) -> Option<TimerHandle> {
        self.active_timer.take()
    }

    /// True if `fired` comes from the outstanding timer.
    pub fn is_current(&self, fired: &TimerFired) -> bool {
        self.active_timer.as_ref().is_some_and(|t| t.matches(fired))
    }

    /// Drop the round and its hints.
    pub fn reset_round(&mut self) {
        self.current_round = None;
        self.hints.reset();
    }

    /// Check that the phase, round and timer agree.
    pub fn check_invariants(&self) -> bool {
        let timer = self.active_timer.as_ref().map(TimerHandle::kind);
        match self.phase {
            Phase::Idle | Phase::Locked => timer.is_none() && self.current_round.is_none(),
            Phase::Question => match (timer, self.round_id()) {
                (Some(TimerKind::RoundTimeout { round_id }), Some(id)) => round_id == id,
                _ => false,
            },
            Phase::Waiting => timer == Some(TimerKind::NextRound),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            round: self.current_round.clone(),
            hint: self.hints.current.clone(),
            timer_start: self.timer_start,
            timer_length: self.timer_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> HintRules {
        HintRules {
            timing: Duration::from_secs(10),
            cooldown: Duration::from_millis(2500),
            max: 3,
        }
    }

    fn at(start: Instant, secs: f64) -> Instant {
        start + Duration::from_secs_f64(secs)
    }

    #[test]
    fn test_hint_schedule_with_cooldown() {
        let start = Instant::now();
        let rules = rules();
        let mut hints = HintState::default();

        // Nothing owed at the very start.
        assert_eq!(hints.next_release(start, start, &rules), None);

        let t = at(start, 11.0);
        assert_eq!(hints.next_release(t, start, &rules), Some(1));
        hints.record(1, "h1".into(), t);

        // Within the cooldown of the previous hint.
        assert_eq!(hints.next_release(at(start, 12.0), start, &rules), None);

        // Three are owed but only one is granted.
        let t = at(start, 21.0);
        assert_eq!(hints.next_release(t, start, &rules), Some(2));
        hints.record(2, "h2".into(), t);

        let t = at(start, 30.0);
        assert_eq!(hints.next_release(t, start, &rules), Some(3));
        hints.record(3, "h3".into(), t);

        assert_eq!(hints.next_release(at(start, 44.0), start, &rules), None);
    }

    #[test]
    fn test_hint_not_owed_yet() {
        let start = Instant::now();
        let rules = rules();
        let mut hints = HintState::default();
        let t = at(start, 3.0);
        assert_eq!(hints.next_release(t, start, &rules), Some(1));
        hints.record(1, "h1".into(), t);
        // Cooldown passed, but the second hint is not due until 10s.
        assert_eq!(hints.next_release(at(start, 9.0), start, &rules), None);
    }

    fn solver(id: PlayerId, name: &str) -> Solver {
        Solver {
            id,
            name: name.into(),
        }
    }

    #[test]
    fn test_streak_announced_once_at_steps() {
        let mut streak = StreakState::default();
        let alice = solver(1, "alice");
        let mut announcements = Vec::new();

        for round in 1..=5 {
            if let Some(event) = streak.record_win(&alice, 5) {
                announcements.push((round, event));
            }
            assert_eq!(streak.held_by(1, 5), round == 5);
        }

        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].0, 5);
        assert_eq!(
            announcements[0].1.to_string(),
            "alice has reached a streak of 5! You can skip to the next round with !next."
        );
    }

    #[test]
    fn test_streak_reset_and_break() {
        let mut streak = StreakState::default();
        let alice = solver(1, "alice");
        let bob = solver(2, "bob");

        for _ in 0..5 {
            streak.record_win(&alice, 5);
        }
        // Exactly at the threshold: replaced without a broken notice.
        assert_eq!(streak.record_win(&bob, 5), None);
        assert_eq!(streak.count, 1);
        assert_eq!(streak.player_id, Some(2));

        for _ in 0..6 {
            streak.record_win(&bob, 5);
        }
        assert_eq!(streak.count, 7);
        let event = streak.record_win(&alice, 5).unwrap();
        assert_eq!(event.to_string(), "alice broke bob's streak of 7!");
        assert_eq!(streak.count, 1);
        assert!(!streak.held_by(2, 5));
    }

    #[test]
    fn test_streak_announced_every_steps() {
        let mut streak = StreakState::default();
        let alice = solver(1, "alice");
        let events: Vec<_> = (0..10).filter_map(|_| streak.record_win(&alice, 5)).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].to_string(), "alice has reached a streak of 10!");
    }

    #[test]
    fn test_fresh_state_is_idle_and_consistent() {
        let state = RoundState::new(Instant::now());
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.timer().is_none());
        assert!(state.check_invariants());
    }

    #[test]
    fn test_rules_from_config() {
        let rules = GameRules::default();
        assert_eq!(rules.round_time, Duration::from_secs(45));
        assert_eq!(rules.inactivity_timeout, Duration::from_secs(180));
        assert_eq!(rules.hints.cooldown, Duration::from_millis(2500));
    }
}
