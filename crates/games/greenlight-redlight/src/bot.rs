use crate::RedLightInput;
use crate::config::BotConfig;
use crate::movement::MoveDirection;
use crate::session::GameSession;

/// Decide the autopilot's next input, or `None` to keep doing what it does.
///
/// The bot walks forward once green has lasted `hesitation_secs` and stops
/// before the light can catch it. It reads the light timer directly, which
/// a human player cannot.
pub fn generate_bot_input(session: &GameSession, config: &BotConfig) -> Option<RedLightInput> {
    if !session.is_active() {
        return None;
    }
    let light = session.light();
    let safe = !session.is_light_red() && light.remaining() > config.safety_margin_secs;

    if session.is_moving() {
        if !safe || session.move_direction() != MoveDirection::Forward {
            return Some(RedLightInput::stop());
        }
        return None;
    }

    if safe && light.elapsed() >= config.hesitation_secs {
        return Some(RedLightInput::go(MoveDirection::Forward));
    }
    None
}
