//! Round persistence abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod memory;
pub mod types;

pub use memory::MemoryStore;
pub use types::{Question, RoundId, RoundRecord, Solver};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Every question has been asked since the chain start.
    #[error("no unused question since {0}")]
    Exhausted(DateTime<Utc>),
    #[error("question bank is empty")]
    EmptyBank,
    #[error("round {0} not found")]
    NotFound(RoundId),
    #[error("round {0} already ended")]
    RoundClosed(RoundId),
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] toml::de::Error),
}

#[async_trait]
pub trait RoundStore: Send + Sync {
    /// Create a round with a question not asked since `chain_start`.
    async fn new_round(&self, chain_start: DateTime<Utc>) -> Result<RoundRecord, StoreError>;

    /// Record the winning answer of an open round.
    async fn solved_by(
        &self,
        round_id: RoundId,
        solver: &Solver,
        time_taken: f64,
        hints: u8,
        streak: u32,
    ) -> Result<RoundRecord, StoreError>;

    /// Close a round. Ending an already ended round is a no-op.
    async fn end_round(&self, round_id: RoundId) -> Result<RoundRecord, StoreError>;
}
