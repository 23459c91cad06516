use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;

/// Unique identifier for a player in the game.
pub type PlayerId = u64;

/// Core trait that every Greenlight game implements.
///
/// The host owns the game value and drives it from a single tick loop;
/// the game only handles game-specific rules.
pub trait GreenlightGame: Send + Sync {
    /// Game metadata for display and host logging.
    fn metadata(&self) -> GameMetadata;

    /// Called when a round starts. Binds players and starts the session.
    fn init(&mut self, players: &[super::player::Player], config: &GameConfig);

    /// Called each frame. Returns the events produced by this tick, in order.
    fn update(&mut self, dt: f32) -> Vec<GameEvent>;

    /// Serialize the authoritative game state for broadcast.
    fn serialize_state(&self) -> Vec<u8>;

    /// Apply authoritative state received from elsewhere.
    fn apply_state(&mut self, state: &[u8]);

    /// Queue an encoded input from a player. Applied on the next `update`.
    fn apply_input(&mut self, player_id: PlayerId, input: &[u8]);

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        30.0
    }

    /// Hint for the number of rounds this game wants to play.
    fn round_count_hint(&self) -> u8 {
        1
    }

    /// Freeze the game. Timers keep their value.
    fn pause(&mut self);

    /// Unfreeze after `pause`.
    fn resume(&mut self);

    /// Return every piece of session state to its initial value.
    /// The game is not playing afterwards until `init` is called again.
    fn reset(&mut self);

    /// Whether the current round is complete.
    fn is_round_complete(&self) -> bool;

    /// Final scores for the completed round.
    fn round_results(&self) -> Vec<PlayerScore>;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
    pub estimated_round_duration: Duration,
}

/// Per-round configuration handed to `init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub round_count: u8,
    /// Zero disables the round time limit.
    pub round_duration: Duration,
    pub custom: HashMap<String, serde_json::Value>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_count: 1,
            round_duration: Duration::ZERO,
            custom: HashMap::new(),
        }
    }
}

/// Score entry for a player at the end of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub score: i32,
}

/// Generates the `GreenlightGame` methods that only move state around:
/// `serialize_state`, `apply_state`, `is_round_complete`.
///
/// Requires the implementing struct to have a `state: $StateType` field, and
/// `$StateType` to have a `round_complete: bool` field. The calling crate must
/// depend on `rmp-serde`.
#[macro_export]
macro_rules! greenlight_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).unwrap_or_default()
        }

        fn apply_state(&mut self, state: &[u8]) {
            if let Ok(s) = rmp_serde::from_slice::<$StateType>(state) {
                self.state = s;
            }
        }

        fn is_round_complete(&self) -> bool {
            self.state.round_complete
        }
    };
}
