//! Movement-violation checks.
//!
//! Pure decisions only. The session applies the resulting elimination.

use greenlight_core::events::LightColor;

use crate::config::DetectionMode;

/// Called synchronously when the light flips. True when the actor is caught:
/// the light just turned red while the actor was moving.
pub fn on_light_changed(new_color: LightColor, is_moving: bool, is_game_over: bool) -> bool {
    !is_game_over && new_color.is_red() && is_moving
}

/// Called on every tick after the flip check. Only continuous detection
/// catches a move that started after the red transition.
pub fn on_red_tick(
    mode: DetectionMode,
    color: LightColor,
    is_moving: bool,
    is_game_over: bool,
) -> bool {
    mode == DetectionMode::Continuous && !is_game_over && color.is_red() && is_moving
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_at_red_flip_is_caught() {
        assert!(on_light_changed(LightColor::Red, true, false));
    }

    #[test]
    fn standing_still_at_red_flip_is_safe() {
        assert!(!on_light_changed(LightColor::Red, false, false));
    }

    #[test]
    fn green_flip_never_catches() {
        assert!(!on_light_changed(LightColor::Green, true, false));
    }

    #[test]
    fn no_double_elimination() {
        assert!(!on_light_changed(LightColor::Red, true, true));
        assert!(!on_red_tick(
            DetectionMode::Continuous,
            LightColor::Red,
            true,
            true
        ));
    }

    #[test]
    fn transition_mode_ignores_moves_mid_red() {
        assert!(!on_red_tick(
            DetectionMode::OnTransition,
            LightColor::Red,
            true,
            false
        ));
    }

    #[test]
    fn continuous_mode_catches_moves_mid_red() {
        assert!(on_red_tick(
            DetectionMode::Continuous,
            LightColor::Red,
            true,
            false
        ));
        assert!(!on_red_tick(
            DetectionMode::Continuous,
            LightColor::Green,
            true,
            false
        ));
    }
}
