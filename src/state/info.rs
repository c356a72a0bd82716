//! Read-only round projection.
//!
//! The actor publishes a [`Snapshot`] after every event. Anyone holding one
//! can compute a [`RoundInfo`] for any instant without touching the actor.

use super::round::Phase;
use crate::store::{RoundId, RoundRecord};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

const IDLE_NOTICE: &str = "Trivia is not running. Say !start to begin a new round.";
const LOCKED_NOTICE: &str = "Trivia is stopped. Only an administrator can start it.";
const STARTING_NOTICE: &str = "A new round is about to start.";

/// Copy of the displayable parts of the round state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub round: Option<RoundRecord>,
    pub hint: Option<String>,
    pub timer_start: Instant,
    pub timer_length: Duration,
}

/// Countdown of the running timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimerInfo {
    /// Seconds left.
    pub time_left: f64,
    /// Share of the timer left, from 1.0 down to 0.0.
    pub fraction: f64,
}

impl TimerInfo {
    fn at(start: Instant, length: Duration, now: Instant) -> Self {
        let left = length.saturating_sub(now.saturating_duration_since(start));
        let fraction = if length.is_zero() {
            0.0
        } else {
            (left.as_secs_f64() / length.as_secs_f64()).clamp(0.0, 1.0)
        };
        Self {
            time_left: left.as_secs_f64(),
            fraction,
        }
    }
}

/// Outcome of the round shown while waiting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Summary {
    Solved {
        solver: String,
        points: u32,
        time_taken: f64,
        question: String,
        answer: String,
    },
    Unsolved {
        question: String,
        answer: String,
    },
}

impl Summary {
    fn of(round: &RoundRecord) -> Self {
        let question = round.question.question.clone();
        let answer = round.question.primary_answer().to_string();
        match (&round.solver, round.solved) {
            (Some(solver), true) => Self::Solved {
                solver: solver.name.clone(),
                points: round.points,
                time_taken: round.time_taken.unwrap_or_default(),
                question,
                answer,
            },
            _ => Self::Unsolved { question, answer },
        }
    }
}

/// Displayable state of the game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundInfo {
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_id: Option<RoundId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl RoundInfo {
    fn bare(phase: Phase) -> Self {
        Self {
            phase,
            round_id: None,
            question: None,
            categories: None,
            hint: None,
            timer: None,
            summary: None,
            notice: None,
        }
    }

    /// Project `snapshot` as seen at `now`.
    pub fn project(snapshot: &Snapshot, now: Instant) -> Self {
        let mut info = Self::bare(snapshot.phase);
        let timer = TimerInfo::at(snapshot.timer_start, snapshot.timer_length, now);

        match snapshot.phase {
            Phase::Question => {
                if let Some(round) = &snapshot.round {
                    info.round_id = Some(round.id);
                    info.question = Some(round.question.question.clone());
                    info.categories = Some(round.question.category_names());
                    info.hint = snapshot.hint.clone();
                }
                info.timer = Some(timer);
            }
            Phase::Waiting => {
                match &snapshot.round {
                    Some(round) => {
                        info.round_id = Some(round.id);
                        info.summary = Some(Summary::of(round));
                    }
                    None => info.notice = Some(STARTING_NOTICE.to_string()),
                }
                info.timer = Some(timer);
            }
            Phase::Idle => info.notice = Some(IDLE_NOTICE.to_string()),
            Phase::Locked => info.notice = Some(LOCKED_NOTICE.to_string()),
        }
        info
    }
}
