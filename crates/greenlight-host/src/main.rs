use tracing_subscriber::EnvFilter;

use greenlight_core::game_trait::GreenlightGame;
use greenlight_host::config::HostConfig;
use greenlight_host::game_loop::{GameBroadcast, GameCommand, spawn_game_session};
use greenlight_redlight::RedLightGreenLight;
use greenlight_redlight::config::RedLightConfig;

fn init_tracing() {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if std::env::var("GREENLIGHT_LOG_FORMAT").is_ok_and(|f| f == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let host = HostConfig::load();
    if let Err(e) = host.validate() {
        tracing::error!(error = %e, "Invalid host configuration");
        std::process::exit(1);
    }
    let game_config = RedLightConfig::load();
    let session = greenlight_host::session_config(&host, &game_config);

    let game = RedLightGreenLight::with_config(game_config);
    tracing::info!(game = %game.metadata().name, "Greenlight host starting");

    let (cmd_tx, mut broadcast_rx, handle) = spawn_game_session(Box::new(game), session);

    loop {
        tokio::select! {
            msg = broadcast_rx.recv() => {
                match msg {
                    Some(GameBroadcast::Started { round, players }) => {
                        tracing::info!(round, players = players.len(), "Round started");
                    },
                    Some(GameBroadcast::State { .. }) => {},
                    Some(GameBroadcast::Event(event)) => {
                        tracing::info!(?event, "Game event");
                    },
                    Some(GameBroadcast::RoundEnd { round, scores }) => {
                        tracing::info!(round, ?scores, "Round ended");
                    },
                    Some(GameBroadcast::GameEnd { final_scores }) => {
                        tracing::info!(?final_scores, "Game over");
                    },
                    Some(GameBroadcast::GameEnded) | None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping game");
                let _ = cmd_tx.send(GameCommand::Stop);
            }
        }
    }

    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Game loop task failed");
    }
}
