use std::time::Duration;

use tokio::sync::mpsc;

use greenlight_core::events::{EliminationCause, GameEvent};
use greenlight_core::player::Player;
use greenlight_host::game_loop::{GameBroadcast, SessionConfig, spawn_game_session};
use greenlight_redlight::RedLightGreenLight;
use greenlight_redlight::config::{BotConfig, DwellRange, RedLightConfig};

fn short_track() -> RedLightConfig {
    let mut config = RedLightConfig {
        seed: Some(17),
        ..RedLightConfig::default()
    };
    config.session.finish_line = 2.0;
    config.session.light.green = DwellRange::new(5.0, 5.0);
    config.contestants.count = 3;
    config
}

fn bot_player() -> Player {
    let mut player = Player::new(1, "Autopilot");
    player.is_bot = true;
    player
}

/// Collect broadcasts until the loop exits or the deadline passes.
async fn collect(mut rx: mpsc::UnboundedReceiver<GameBroadcast>) -> Vec<GameBroadcast> {
    let mut out = Vec::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while let Ok(Some(msg)) = tokio::time::timeout_at(deadline, rx.recv()).await {
        let done = matches!(msg, GameBroadcast::GameEnded);
        out.push(msg);
        if done {
            break;
        }
    }
    out
}

#[tokio::test]
async fn autopilot_wins_short_track() {
    let config = SessionConfig {
        players: vec![bot_player()],
        round_count: 1,
        tick_rate: Some(120.0),
        autopilot: Some(BotConfig::default()),
        ..SessionConfig::default()
    };
    let game = RedLightGreenLight::with_config(short_track());
    let (_cmd_tx, rx, handle) = spawn_game_session(Box::new(game), config);

    let msgs = collect(rx).await;
    let _ = handle.await;

    assert!(
        msgs.iter()
            .any(|m| matches!(m, GameBroadcast::Event(GameEvent::PlayerWon))),
        "autopilot should reach the finish line"
    );
    let final_scores = msgs
        .iter()
        .find_map(|m| match m {
            GameBroadcast::GameEnd { final_scores } => Some(final_scores.clone()),
            _ => None,
        })
        .expect("GameEnd broadcast");
    assert_eq!(final_scores.len(), 1);
    assert_eq!(final_scores[0].player_id, 1);
    assert!(final_scores[0].score >= 10);
    assert!(matches!(msgs.last(), Some(GameBroadcast::GameEnded)));
}

#[tokio::test]
async fn runs_every_round_then_ends() {
    let config = SessionConfig {
        players: vec![bot_player()],
        round_count: 2,
        between_round_duration: Duration::from_millis(20),
        tick_rate: Some(120.0),
        autopilot: Some(BotConfig::default()),
        ..SessionConfig::default()
    };
    let game = RedLightGreenLight::with_config(short_track());
    let (_cmd_tx, rx, handle) = spawn_game_session(Box::new(game), config);

    let msgs = collect(rx).await;
    let _ = handle.await;

    let started: Vec<u8> = msgs
        .iter()
        .filter_map(|m| match m {
            GameBroadcast::Started { round, .. } => Some(*round),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![1, 2]);

    let round_ends: Vec<u8> = msgs
        .iter()
        .filter_map(|m| match m {
            GameBroadcast::RoundEnd { round, .. } => Some(*round),
            _ => None,
        })
        .collect();
    assert_eq!(round_ends, vec![1, 2]);

    let game_end = msgs
        .iter()
        .position(|m| matches!(m, GameBroadcast::GameEnd { .. }))
        .expect("GameEnd broadcast");
    assert_eq!(game_end, msgs.len() - 2, "GameEnd comes right before GameEnded");
}

#[tokio::test]
async fn idle_player_runs_out_of_time() {
    let config = SessionConfig {
        players: vec![Player::new(1, "Idle")],
        round_count: 1,
        round_duration: Duration::from_secs(1),
        tick_rate: Some(120.0),
        ..SessionConfig::default()
    };
    let game = RedLightGreenLight::with_config(short_track());
    let (_cmd_tx, rx, handle) = spawn_game_session(Box::new(game), config);

    let msgs = collect(rx).await;
    let _ = handle.await;

    assert!(msgs.iter().any(|m| matches!(
        m,
        GameBroadcast::Event(GameEvent::PlayerEliminated {
            cause: EliminationCause::TimeExpired
        })
    )));
    let scores = msgs
        .iter()
        .find_map(|m| match m {
            GameBroadcast::RoundEnd { scores, .. } => Some(scores.clone()),
            _ => None,
        })
        .expect("RoundEnd broadcast");
    assert_eq!(scores[0].score, 0);
}
