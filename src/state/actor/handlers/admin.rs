//! Admin order execution.
//!
//! Permission checks live in [`crate::handlers::admin`]. This module applies
//! an authorized order to the round state.

use super::lifecycle::ADMIN_STOP_NOTICE;
use crate::error::AdminError;
use crate::handlers::{AdminCommand, AdminOrder, authorize};
use crate::players::PlayerId;
use crate::state::TriviaActor;
use crate::state::round::Phase;
use crate::telemetry::spans;
use tracing::{Instrument, info, warn};

impl TriviaActor {
    pub(crate) async fn handle_admin(&mut self, player_id: PlayerId, command: &str, args: &[String]) {
        let span = spans::admin(command, player_id);
        self.execute_admin(player_id, command, args)
            .instrument(span)
            .await;
    }

    async fn execute_admin(&mut self, player_id: PlayerId, command: &str, args: &[String]) {
        let authorized = authorize(self.directory.as_ref(), player_id, command, args).await;
        let result = match authorized {
            Ok(order) => self.apply_order(order).await,
            Err(e) => Err(e),
        };

        let label = command
            .parse::<AdminCommand>()
            .map(AdminCommand::name)
            .unwrap_or("unknown");
        match result {
            Ok(()) => crate::metrics::record_admin(label, "ok"),
            Err(e) => {
                if matches!(e, AdminError::Unauthorized { .. }) {
                    warn!(error = %e, "Admin command rejected");
                } else {
                    info!(player_id, error = %e, "Admin command rejected");
                }
                crate::metrics::record_admin(label, e.error_code());
            }
        }
    }

    async fn apply_order(&mut self, order: AdminOrder) -> Result<(), AdminError> {
        let phase = self.state.phase;
        let invalid = |command: AdminCommand| AdminError::InvalidPhase {
            command: command.name(),
            phase: phase.as_str(),
        };

        match order {
            AdminOrder::Next => {
                if !self.next_round().await {
                    return Err(invalid(AdminCommand::Next));
                }
            }
            AdminOrder::Stop { lock } => self.stop_game(Some(ADMIN_STOP_NOTICE), lock),
            AdminOrder::Unlock => {
                if phase != Phase::Locked {
                    return Err(invalid(AdminCommand::Unlock));
                }
                self.state.phase = Phase::Idle;
                self.broadcast_info();
            }
            AdminOrder::Start => {
                if !matches!(phase, Phase::Idle | Phase::Locked) {
                    return Err(invalid(AdminCommand::Start));
                }
                self.begin_session();
            }
        }
        Ok(())
    }
}
