//! Round state and the engine actor.
//!
//! - [`round`]: phase, hint and streak bookkeeping owned by the actor
//! - [`timer`]: cancellable delayed events tagged with an epoch
//! - [`info`]: read-only projection published to observers
//! - [`actor`]: the task that serializes every mutation

mod actor;
pub mod info;
pub mod round;
pub mod timer;

pub use actor::{GameEvent, GameHandle, StateView, TriviaActor};
pub use info::{RoundInfo, Snapshot, Summary, TimerInfo};
pub use round::{GameRules, HintRules, HintState, Phase, RoundState, StreakEvent, StreakState};
pub use timer::{Scheduler, TimerFired, TimerHandle, TimerKind};
