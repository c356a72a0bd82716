//! Actor model for the trivia engine.
//!
//! The `TriviaActor` owns the [`RoundState`] in a single Tokio task. Chat
//! lines, admin commands, player count updates and timer firings all arrive
//! as [`GameEvent`]s on one unbounded queue and are applied strictly in order.
//!
//! # Architecture
//!
//! - **State Ownership**: only the actor task reads or writes `RoundState`.
//! - **Timers**: timer tasks hold a weak sender and marshal their firing onto
//!   the queue. A firing is applied only if its epoch is still current.
//! - **Projection**: after every event the actor publishes a [`Snapshot`]
//!   through a watch channel, so [`GameHandle::round_info`] never waits on
//!   the queue.

use crate::error::EngineError;
use crate::fanout::Fanout;
use crate::players::{Player, PlayerDirectory, PlayerId};
use crate::state::info::{RoundInfo, Snapshot};
use crate::state::round::{GameRules, RoundState};
use crate::state::timer::{Scheduler, TimerHandle};
use crate::store::RoundStore;
use crate::telemetry::{EventTimer, spans};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{Instrument, error, info};

mod handlers;
mod types;

pub use types::*;

/// Cloneable front door to a running engine.
#[derive(Clone)]
pub struct GameHandle {
    events: mpsc::UnboundedSender<GameEvent>,
    snapshot: watch::Receiver<Snapshot>,
}

impl GameHandle {
    fn send(&self, event: GameEvent) -> Result<(), EngineError> {
        self.events.send(event).map_err(|_| EngineError::Closed)
    }

    /// Enqueue a chat line from `player`.
    pub fn submit_chat(&self, player: Player, text: impl Into<String>) -> Result<(), EngineError> {
        self.send(GameEvent::Chat {
            player,
            text: text.into(),
        })
    }

    /// Enqueue an admin command without going through chat.
    pub fn run_admin(
        &self,
        player_id: PlayerId,
        command: impl Into<String>,
        args: Vec<String>,
    ) -> Result<(), EngineError> {
        self.send(GameEvent::Admin {
            player_id,
            command: command.into(),
            args,
        })
    }

    pub fn set_player_count(&self, count: usize) -> Result<(), EngineError> {
        self.send(GameEvent::PlayerCount(count))
    }

    pub fn shutdown(&self) -> Result<(), EngineError> {
        self.send(GameEvent::Shutdown)
    }

    /// Current displayable state, projected from the latest snapshot.
    pub fn round_info(&self) -> RoundInfo {
        RoundInfo::project(&self.snapshot.borrow(), Instant::now())
    }

    /// Query the engine through its queue. Every event sent before this
    /// call has been applied when the view comes back.
    pub async fn inspect(&self) -> Result<StateView, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(GameEvent::Inspect { reply_tx })?;
        Ok(reply_rx.await?)
    }

    /// Wait until the actor task has exited.
    pub async fn closed(&self) {
        let mut snapshot = self.snapshot.clone();
        while snapshot.changed().await.is_ok() {}
    }
}

/// The trivia engine actor.
pub struct TriviaActor {
    state: RoundState,
    rules: GameRules,
    scheduler: Scheduler<GameEvent>,
    store: Arc<dyn RoundStore>,
    directory: Arc<dyn PlayerDirectory>,
    fanout: Arc<dyn Fanout>,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl TriviaActor {
    /// Create the engine and spawn it on the current runtime.
    pub fn spawn(
        rules: GameRules,
        store: Arc<dyn RoundStore>,
        directory: Arc<dyn PlayerDirectory>,
        fanout: Arc<dyn Fanout>,
    ) -> GameHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = RoundState::new(Instant::now());
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let actor = Self {
            state,
            rules,
            scheduler: Scheduler::new(tx.downgrade()),
            store,
            directory,
            fanout,
            snapshot_tx,
        };

        tokio::spawn(async move {
            actor.run(rx).await;
        });

        GameHandle {
            events: tx,
            snapshot: snapshot_rx,
        }
    }

    /// The main actor loop.
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<GameEvent>) {
        info!(round_time = ?self.rules.round_time, wait_time = ?self.rules.wait_time, "Trivia engine started");

        while let Some(event) = rx.recv().await {
            if matches!(event, GameEvent::Shutdown) {
                break;
            }
            self.handle_event(event).await;

            if !self.state.check_invariants() {
                error!(
                    phase = %self.state.phase,
                    round_id = ?self.state.round_id(),
                    timer = ?self.state.timer().map(TimerHandle::kind),
                    "Round state invariant violated"
                );
            }
            self.snapshot_tx.send_replace(self.state.snapshot());
        }

        self.state.disarm();
        info!("Trivia engine stopped");
    }

    async fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Chat { player, text } => {
                let _timer = EventTimer::new("chat");
                let span = spans::chat(&player.name);
                self.handle_chat(player, text).instrument(span).await;
            }
            GameEvent::Admin {
                player_id,
                command,
                args,
            } => {
                let _timer = EventTimer::new("admin");
                self.state.last_activity = Instant::now();
                self.handle_admin(player_id, &command, &args).await;
            }
            GameEvent::PlayerCount(count) => {
                self.state.player_count = count;
                crate::metrics::set_players(count);
            }
            GameEvent::TimerFired(fired) => {
                let _timer = EventTimer::new("timer");
                let span = spans::timer(fired.epoch);
                self.handle_timer(fired).instrument(span).await;
            }
            GameEvent::Inspect { reply_tx } => {
                let _ = reply_tx.send(self.view());
            }
            // Consumed by `run`.
            GameEvent::Shutdown => {}
        }
    }

    fn view(&self) -> StateView {
        let timer = self.state.timer();
        StateView {
            phase: self.state.phase,
            round: self.state.current_round.clone(),
            hint_count: self.state.hints.count,
            hint: self.state.hints.current.clone(),
            streak: self.state.streak.clone(),
            player_count: self.state.player_count,
            timer: timer.map(TimerHandle::kind),
            epoch: timer.map(TimerHandle::epoch),
            invariants_hold: self.state.check_invariants(),
        }
    }
}
