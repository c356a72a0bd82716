//! Chat line handling.

use crate::handlers::{ChatIntent, classify};
use crate::players::Player;
use crate::state::TriviaActor;
use tokio::time::Instant;
use tracing::debug;

impl TriviaActor {
    pub(crate) async fn handle_chat(&mut self, player: Player, text: String) {
        self.state.last_activity = Instant::now();
        crate::metrics::record_chat();

        let question = self.state.current_round.as_ref().map(|r| &r.question);
        let intent = classify(&player, &text, self.state.phase, question);

        match intent {
            ChatIntent::Admin { command, args } => {
                self.handle_admin(player.id, &command, &args).await;
            }
            ChatIntent::Answer => self.round_solved(&player).await,
            ChatIntent::Hint => self.release_hint(),
            ChatIntent::Next => {
                if self.state.streak.held_by(player.id, self.rules.streak_steps) {
                    self.next_round().await;
                } else {
                    debug!(player = %player.name, "Skip requested without a streak");
                }
            }
            ChatIntent::Start => self.begin_session(),
            ChatIntent::Ignore => {}
        }
    }
}
