//! Player identity and admin permissions.
//!
//! The transport attaches a [`Player`] to every chat line. Admin commands
//! re-resolve the caller through a [`PlayerDirectory`] so permissions are
//! never taken from the chat event itself.

use crate::config::AdminBlock;
use crate::handlers::AdminCommand;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

pub type PlayerId = u64;

/// Commands a player may run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Grants {
    #[default]
    None,
    All,
    Only(HashSet<AdminCommand>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Zero for regular players. Anything higher may attempt admin commands.
    pub level: u8,
    pub grants: Grants,
}

impl Player {
    pub fn guest(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: 0,
            grants: Grants::None,
        }
    }

    pub fn has_permission(&self, command: AdminCommand) -> bool {
        match &self.grants {
            Grants::None => false,
            Grants::All => true,
            Grants::Only(commands) => commands.contains(&command),
        }
    }
}

#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    async fn lookup(&self, id: PlayerId) -> Option<Player>;
}

/// Directory seeded from `[[admin]]` blocks. Unknown names become guests
/// with stable ids.
pub struct StaticDirectory {
    by_name: DashMap<String, Player>,
    names: DashMap<PlayerId, String>,
    next_id: AtomicU64,
}

impl StaticDirectory {
    pub fn from_blocks(blocks: &[AdminBlock]) -> Self {
        let directory = Self {
            by_name: DashMap::new(),
            names: DashMap::new(),
            next_id: AtomicU64::new(1),
        };
        for block in blocks {
            let grants = grants_from(block);
            let id = directory.allocate_id();
            let player = Player {
                id,
                name: block.name.clone(),
                level: block.level,
                grants,
            };
            directory.insert(player);
        }
        directory
    }

    fn allocate_id(&self) -> PlayerId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn insert(&self, player: Player) {
        self.names.insert(player.id, player.name.to_lowercase());
        self.by_name.insert(player.name.to_lowercase(), player);
    }

    /// Resolve a display name, registering a guest on first sight.
    pub fn resolve(&self, name: &str) -> Player {
        self.by_name
            .entry(name.to_lowercase())
            .or_insert_with(|| {
                let player = Player::guest(self.allocate_id(), name);
                self.names.insert(player.id, player.name.to_lowercase());
                player
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn grants_from(block: &AdminBlock) -> Grants {
    if block.commands.iter().any(|c| c == "*") {
        return Grants::All;
    }
    let mut commands = HashSet::new();
    for name in &block.commands {
        match name.parse::<AdminCommand>() {
            Ok(command) => {
                commands.insert(command);
            }
            Err(e) => warn!(admin = %block.name, error = %e, "Ignoring unknown grant"),
        }
    }
    if commands.is_empty() {
        Grants::None
    } else {
        Grants::Only(commands)
    }
}

#[async_trait]
impl PlayerDirectory for StaticDirectory {
    async fn lookup(&self, id: PlayerId) -> Option<Player> {
        let name = self.names.get(&id)?.value().clone();
        self.by_name.get(&name).map(|p| p.value().clone())
    }
}
