//! In-process round store backed by a question bank file.
//!
//! Rounds live for the lifetime of the process. Questions are drawn at
//! random among those not asked since the caller's chain start.

use super::{Question, RoundId, RoundRecord, RoundStore, Solver, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct QuestionBank {
    #[serde(default)]
    question: Vec<Question>,
}

pub struct MemoryStore {
    bank: Vec<Question>,
    rounds: Mutex<Vec<RoundRecord>>,
}

impl MemoryStore {
    pub fn new(bank: Vec<Question>) -> Self {
        Self {
            bank,
            rounds: Mutex::new(Vec::new()),
        }
    }

    /// Load a `[[question]]` TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let bank: QuestionBank = toml::from_str(&content)?;
        if bank.question.is_empty() {
            return Err(StoreError::EmptyBank);
        }
        Ok(Self::new(bank.question))
    }

    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    pub fn round(&self, id: RoundId) -> Option<RoundRecord> {
        let rounds = self.rounds.lock();
        rounds.iter().find(|r| r.id == id).cloned()
    }

    fn with_open_round<F>(&self, round_id: RoundId, f: F) -> Result<RoundRecord, StoreError>
    where
        F: FnOnce(&mut RoundRecord),
    {
        let mut rounds = self.rounds.lock();
        let round = rounds
            .iter_mut()
            .find(|r| r.id == round_id)
            .ok_or(StoreError::NotFound(round_id))?;
        if round.is_ended() {
            return Err(StoreError::RoundClosed(round_id));
        }
        f(round);
        Ok(round.clone())
    }
}

#[async_trait]
impl RoundStore for MemoryStore {
    async fn new_round(&self, chain_start: DateTime<Utc>) -> Result<RoundRecord, StoreError> {
        if self.bank.is_empty() {
            return Err(StoreError::EmptyBank);
        }

        let mut rounds = self.rounds.lock();
        let used: HashSet<u64> = rounds
            .iter()
            .filter(|r| r.started_at >= chain_start)
            .map(|r| r.question.id)
            .collect();
        let candidates: Vec<&Question> =
            self.bank.iter().filter(|q| !used.contains(&q.id)).collect();
        let question = candidates
            .choose(&mut rand::thread_rng())
            .map(|q| (*q).clone())
            .ok_or(StoreError::Exhausted(chain_start))?;

        let id = rounds.len() as RoundId + 1;
        let record = RoundRecord::new(id, question, Utc::now());
        debug!(round_id = id, question_id = record.question.id, "Round created");
        rounds.push(record.clone());
        Ok(record)
    }

    async fn solved_by(
        &self,
        round_id: RoundId,
        solver: &Solver,
        time_taken: f64,
        hints: u8,
        streak: u32,
    ) -> Result<RoundRecord, StoreError> {
        self.with_open_round(round_id, |round| {
            round.record_solve(solver.clone(), time_taken, hints, streak);
        })
    }

    async fn end_round(&self, round_id: RoundId) -> Result<RoundRecord, StoreError> {
        let mut rounds = self.rounds.lock();
        let round = rounds
            .iter_mut()
            .find(|r| r.id == round_id)
            .ok_or(StoreError::NotFound(round_id))?;
        round.end(Utc::now());
        Ok(round.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn bank(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|id| Question {
                id,
                question: format!("Question {}", id),
                categories: vec![],
                answers: vec![format!("answer {}", id)],
                hints: vec![],
            })
            .collect()
    }

    #[tokio::test]
    async fn test_questions_not_repeated_within_chain() {
        let store = MemoryStore::new(bank(3));
        let chain_start = Utc::now();

        let mut seen = HashSet::new();
        for _ in 0..3 {
            let round = store.new_round(chain_start).await.unwrap();
            assert!(seen.insert(round.question.id));
        }

        let err = store.new_round(chain_start).await.unwrap_err();
        assert!(matches!(err, StoreError::Exhausted(_)));

        // A fresh chain start makes the whole bank available again.
        let later = Utc::now() + chrono::Duration::seconds(1);
        let round = store.new_round(later).await.unwrap();
        assert_eq!(round.id, 4);
    }

    #[tokio::test]
    async fn test_solved_round_is_closed_after_end() {
        let store = MemoryStore::new(bank(1));
        let round = store.new_round(Utc::now()).await.unwrap();
        let solver = Solver {
            id: 1,
            name: "alice".into(),
        };

        let solved = store.solved_by(round.id, &solver, 4.2, 0, 1).await.unwrap();
        assert!(solved.solved);
        assert_eq!(solved.points, 10);

        let ended = store.end_round(round.id).await.unwrap();
        assert!(ended.is_ended());

        let err = store.solved_by(round.id, &solver, 5.0, 0, 1).await.unwrap_err();
        assert!(matches!(err, StoreError::RoundClosed(id) if id == round.id));
        assert_eq!(store.round(round.id).unwrap().time_taken, Some(4.2));
    }

    #[tokio::test]
    async fn test_missing_round() {
        let store = MemoryStore::new(bank(1));
        assert!(matches!(
            store.end_round(42).await,
            Err(StoreError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_empty_bank() {
        let store = MemoryStore::new(vec![]);
        assert!(matches!(
            store.new_round(Utc::now()).await,
            Err(StoreError::EmptyBank)
        ));
    }

    #[test]
    fn test_load_bank_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[question]]
id = 1
question = "Largest planet?"
categories = ["Space"]
answers = ["Jupiter"]

[[question]]
id = 2
question = "Chemical symbol for gold?"
answers = ["Au"]
hints = ["Latin: aurum"]
"#
        )
        .unwrap();

        let store = MemoryStore::load(file.path()).unwrap();
        assert_eq!(store.question_count(), 2);
    }
}
