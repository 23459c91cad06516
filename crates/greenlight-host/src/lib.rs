pub mod config;
pub mod game_loop;

use std::time::Duration;

use greenlight_core::player::Player;
use greenlight_redlight::config::RedLightConfig;

use config::HostConfig;
use game_loop::SessionConfig;

/// Build the session config for a single local player from host config.
pub fn session_config(host: &HostConfig, game: &RedLightConfig) -> SessionConfig {
    let mut player = Player::new(1, host.player_name.clone());
    player.is_bot = host.autopilot;

    let mut custom = std::collections::HashMap::new();
    if let Some(seed) = host.seed {
        custom.insert("seed".to_string(), serde_json::json!(seed));
    }
    if let Some(detection) = host.detection
        && let Ok(value) = serde_json::to_value(detection)
    {
        custom.insert("detection".to_string(), value);
    }

    SessionConfig {
        players: vec![player],
        round_count: host.round_count,
        round_duration: Duration::from_secs(host.round_duration_secs),
        between_round_duration: Duration::from_secs(host.between_round_secs),
        custom,
        tick_rate: host.tick_rate_override,
        autopilot: host.autopilot.then(|| game.bot.clone()),
    }
}
