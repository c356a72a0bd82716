//! Delayed engine events.
//!
//! A timer is a tokio task that sleeps and then sends [`TimerFired`] into the
//! engine queue. It holds only a weak sender, so a pending timer never keeps
//! the engine alive. Aborting the task is best effort: a firing may already
//! be queued, which is why every firing carries the epoch it was armed under.

use crate::store::RoundId;
use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The answering window of a round closed.
    RoundTimeout { round_id: RoundId },
    /// The pause before the next question is over.
    NextRound,
}

/// Delivered to the engine when a timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub epoch: u64,
    pub kind: TimerKind,
}

/// Handle to one pending timer.
#[derive(Debug)]
pub struct TimerHandle {
    epoch: u64,
    kind: TimerKind,
    task: AbortHandle,
}

impl TimerHandle {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// True if `fired` was produced by this timer.
    pub fn matches(&self, fired: &TimerFired) -> bool {
        self.epoch == fired.epoch && self.kind == fired.kind
    }

    pub fn cancel(self) {
        self.task.abort();
    }
}

/// Arms timers that report back into an engine queue of `E`.
pub struct Scheduler<E> {
    events: WeakUnboundedSender<E>,
    epoch: u64,
}

impl<E> Scheduler<E>
where
    E: From<TimerFired> + Send + 'static,
{
    pub fn new(events: WeakUnboundedSender<E>) -> Self {
        Self { events, epoch: 0 }
    }

    /// Epoch of the most recently armed timer.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Arm a timer. Must be called from within a tokio runtime.
    pub fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        self.epoch += 1;
        let fired = TimerFired {
            epoch: self.epoch,
            kind,
        };
        let deadline = Instant::now() + delay;
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx.send(E::from(fired));
            }
        });

        TimerHandle {
            epoch: fired.epoch,
            kind,
            task: task.abort_handle(),
        }
    }
}
