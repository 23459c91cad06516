use serde::{Deserialize, Serialize};

/// Color of the doll's signal light.
///
/// Green means movement is allowed; red means anyone caught moving is out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightColor {
    #[default]
    Green,
    Red,
}

impl LightColor {
    /// The other color. The light only ever alternates.
    pub fn flipped(self) -> Self {
        match self {
            Self::Green => Self::Red,
            Self::Red => Self::Green,
        }
    }

    pub fn is_red(self) -> bool {
        self == Self::Red
    }
}

impl std::fmt::Display for LightColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Red => write!(f, "red"),
        }
    }
}

/// Why the controlled player lost the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationCause {
    /// Moving while the light was red.
    CaughtMoving,
    /// The round time limit ran out before the finish line was reached.
    TimeExpired,
}

/// Events emitted by a game during update.
///
/// Rendering, audio and UI collaborators subscribe to these; the core only
/// defines the event and its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LightChanged { light: LightColor },
    PlayerEliminated { cause: EliminationCause },
    PlayerWon,
    ContestantEliminated { contestant_id: u32 },
    ContestantFinished { contestant_id: u32 },
    RoundComplete,
}

impl GameEvent {
    /// Whether this event ends the controlled player's round.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PlayerEliminated { .. } | Self::PlayerWon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_flips_alternate() {
        assert_eq!(LightColor::Green.flipped(), LightColor::Red);
        assert_eq!(LightColor::Red.flipped(), LightColor::Green);
        assert_eq!(LightColor::Green.flipped().flipped(), LightColor::Green);
    }

    #[test]
    fn default_light_is_green() {
        assert_eq!(LightColor::default(), LightColor::Green);
        assert!(!LightColor::default().is_red());
    }

    #[test]
    fn light_serializes_lowercase() {
        let json = serde_json::to_string(&LightColor::Red).unwrap();
        assert_eq!(json, "\"red\"");
        let parsed: LightColor = serde_json::from_str("\"green\"").unwrap();
        assert_eq!(parsed, LightColor::Green);
    }

    #[test]
    fn terminal_events() {
        assert!(GameEvent::PlayerWon.is_terminal());
        assert!(
            GameEvent::PlayerEliminated {
                cause: EliminationCause::CaughtMoving
            }
            .is_terminal()
        );
        assert!(
            !GameEvent::LightChanged {
                light: LightColor::Red
            }
            .is_terminal()
        );
        assert!(!GameEvent::RoundComplete.is_terminal());
    }

    #[test]
    fn elimination_cause_json_names() {
        let json = serde_json::to_string(&EliminationCause::TimeExpired).unwrap();
        assert_eq!(json, "\"time_expired\"");
    }
}
