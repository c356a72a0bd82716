//! Admin command authorization.
//!
//! Handles:
//! - `next` - skip to the next question, ignoring the streak gate
//! - `stop [lock]` - stop the game, optionally locking it
//! - `unlock` - release a locked game
//! - `start` - start a session, even from a locked game
//!
//! Authorization produces an [`AdminOrder`]. The engine applies it, so this
//! module never touches round state.

use crate::error::AdminError;
use crate::players::{PlayerDirectory, PlayerId};
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminCommand {
    Next,
    Stop,
    Unlock,
    Start,
}

impl AdminCommand {
    pub const ALL: [AdminCommand; 4] = [Self::Next, Self::Stop, Self::Unlock, Self::Start];

    pub fn name(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Stop => "stop",
            Self::Unlock => "unlock",
            Self::Start => "start",
        }
    }
}

impl fmt::Display for AdminCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdminCommand {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AdminError::UnknownCommand(s.to_string()))
    }
}

/// A privileged operation the engine should carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOrder {
    Next,
    Stop { lock: bool },
    Unlock,
    Start,
}

/// Check that `player_id` may run `name` and build the matching order.
pub async fn authorize(
    directory: &dyn PlayerDirectory,
    player_id: PlayerId,
    name: &str,
    args: &[String],
) -> Result<AdminOrder, AdminError> {
    let command: AdminCommand = name.parse()?;
    let player = directory
        .lookup(player_id)
        .await
        .ok_or(AdminError::UnknownPlayer(player_id))?;

    if !player.has_permission(command) {
        return Err(AdminError::Unauthorized {
            player: player.name,
            command: command.name(),
        });
    }

    info!(player = %player.name, command = %command, ?args, "Admin command executed");

    Ok(match command {
        AdminCommand::Next => AdminOrder::Next,
        AdminCommand::Stop => AdminOrder::Stop {
            lock: args.iter().any(|a| a.eq_ignore_ascii_case("lock")),
        },
        AdminCommand::Unlock => AdminOrder::Unlock,
        AdminCommand::Start => AdminOrder::Start,
    })
}
