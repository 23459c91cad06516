use serde::{Deserialize, Serialize};

use crate::game_trait::PlayerId;

/// A player attached to a Greenlight session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    /// Spectators watch but never control the actor.
    pub is_spectator: bool,
    /// Driven by the autopilot instead of an input device.
    #[serde(default)]
    pub is_bot: bool,
}

impl Player {
    pub fn new(id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_spectator: false,
            is_bot: false,
        }
    }

    /// Whether this player may control the actor.
    pub fn is_active(&self) -> bool {
        !self.is_spectator
    }
}

/// The first active player controls the actor; everyone else watches.
pub fn controlling_player(players: &[Player]) -> Option<&Player> {
    players.iter().find(|p| p.is_active())
}
