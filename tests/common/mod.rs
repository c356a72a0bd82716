//! Integration test common infrastructure.
//!
//! Spawns an engine over an in-memory question bank and a static player
//! directory. Tests run on paused tokio time, so every sleep advances the
//! clock exactly and timers fire in deadline order.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use trivia_ng::config::AdminBlock;
use trivia_ng::state::StateView;
use trivia_ng::{
    BroadcastFanout, GameHandle, GameRules, MemoryStore, Outbound, Phase, Player, Question,
    StaticDirectory, TriviaActor,
};

pub struct TestGame {
    pub handle: GameHandle,
    pub store: Arc<MemoryStore>,
    pub directory: Arc<StaticDirectory>,
    pub outbound: broadcast::Receiver<Outbound>,
    pub rules: GameRules,
}

/// `n` questions, each answered by `city{id}`.
pub fn bank(n: u64) -> Vec<Question> {
    (1..=n)
        .map(|id| Question {
            id,
            question: format!("Which city is number {}?", id),
            categories: vec!["Geography".into()],
            answers: vec![format!("city{}", id)],
            hints: vec![],
        })
        .collect()
}

/// `root` may run everything, `skipper` may only run `next`.
pub fn admins() -> Vec<AdminBlock> {
    vec![
        AdminBlock {
            name: "root".into(),
            level: 2,
            commands: vec!["*".into()],
        },
        AdminBlock {
            name: "skipper".into(),
            level: 1,
            commands: vec!["next".into()],
        },
    ]
}

impl TestGame {
    pub async fn spawn() -> Self {
        Self::with(GameRules::default(), bank(20)).await
    }

    pub async fn with(rules: GameRules, questions: Vec<Question>) -> Self {
        let store = Arc::new(MemoryStore::new(questions));
        let directory = Arc::new(StaticDirectory::from_blocks(&admins()));
        let fanout = BroadcastFanout::new(1024);
        let outbound = fanout.subscribe();

        let handle = TriviaActor::spawn(
            rules.clone(),
            store.clone(),
            directory.clone(),
            Arc::new(fanout),
        );
        handle.set_player_count(1).expect("engine running");

        Self {
            handle,
            store,
            directory,
            outbound,
            rules,
        }
    }

    pub fn player(&self, name: &str) -> Player {
        self.directory.resolve(name)
    }

    /// Send a chat line and wait until the engine has applied it.
    pub async fn say(&self, name: &str, text: &str) -> StateView {
        self.handle
            .submit_chat(self.player(name), text)
            .expect("engine running");
        self.view().await
    }

    pub async fn view(&self) -> StateView {
        self.handle.inspect().await.expect("engine running")
    }

    /// Let `secs` of game time pass.
    pub async fn advance(&self, secs: f64) -> StateView {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
        self.view().await
    }

    /// From Idle: `!start` and wait out the session delay.
    pub async fn start_round(&self) -> StateView {
        let view = self.say("alice", "!start").await;
        assert_eq!(view.phase, Phase::Waiting);
        let view = self.advance(self.rules.wait_time.as_secs_f64() / 2.0 + 0.1).await;
        assert_eq!(view.phase, Phase::Question);
        view
    }

    /// From Waiting after a round: wait out the pause.
    pub async fn next_question(&self) -> StateView {
        let view = self.advance(self.rules.wait_time.as_secs_f64() + 0.1).await;
        assert_eq!(view.phase, Phase::Question);
        view
    }

    /// Correct answer to the live question.
    pub fn answer(view: &StateView) -> String {
        view.round
            .as_ref()
            .expect("live round")
            .question
            .primary_answer()
            .to_string()
    }

    /// All system texts published so far.
    pub fn system_messages(&mut self) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(msg) = self.outbound.try_recv() {
            if let Outbound::System(text) = msg {
                texts.push(text);
            }
        }
        texts
    }
}
