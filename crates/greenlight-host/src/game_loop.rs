use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use greenlight_core::events::GameEvent;
use greenlight_core::game_trait::{GameConfig, GreenlightGame, PlayerId, PlayerScore};
use greenlight_core::player::Player;
use greenlight_redlight::config::BotConfig;

/// Commands sent from input sources to the game tick loop.
#[derive(Debug)]
pub enum GameCommand {
    PlayerInput {
        player_id: PlayerId,
        input_data: Vec<u8>,
    },
    Pause,
    Resume,
    /// Restart the current round from scratch.
    Restart,
    Stop,
}

/// Broadcasts sent from the game tick loop to every subscriber.
#[derive(Debug, Clone)]
pub enum GameBroadcast {
    Started {
        round: u8,
        players: Vec<Player>,
    },
    /// Serialized game state. `Bytes` keeps clones cheap across subscribers.
    State {
        tick: u32,
        state: Bytes,
    },
    Event(GameEvent),
    RoundEnd {
        round: u8,
        scores: Vec<PlayerScore>,
    },
    GameEnd {
        final_scores: Vec<PlayerScore>,
    },
    /// The loop has exited.
    GameEnded,
}

/// Configuration for a game session run by the host.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub players: Vec<Player>,
    /// Zero uses the game's round count hint.
    pub round_count: u8,
    pub round_duration: Duration,
    pub between_round_duration: Duration,
    pub custom: HashMap<String, serde_json::Value>,
    /// Overrides the game's tick rate.
    pub tick_rate: Option<f32>,
    /// Drives bot players with the red light autopilot.
    pub autopilot: Option<BotConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            round_count: 0,
            round_duration: Duration::ZERO,
            between_round_duration: Duration::from_secs(3),
            custom: HashMap::new(),
            tick_rate: None,
            autopilot: None,
        }
    }
}

/// Spawn a game tick loop as a tokio task.
/// Returns the command sender, the broadcast receiver and the task handle.
pub fn spawn_game_session(
    mut game: Box<dyn GreenlightGame>,
    config: SessionConfig,
) -> (
    mpsc::UnboundedSender<GameCommand>,
    mpsc::UnboundedReceiver<GameBroadcast>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_game_tick_loop(&mut *game, config, cmd_rx, broadcast_tx).await;
    });

    (cmd_tx, broadcast_rx, handle)
}

/// Per-round config. A fixed seed is offset by the round so rounds differ.
fn round_config(config: &SessionConfig, round_count: u8, round: u8) -> GameConfig {
    let mut custom = config.custom.clone();
    if let Some(seed) = custom.get("seed").and_then(|v| v.as_u64()) {
        custom.insert(
            "seed".to_string(),
            serde_json::json!(seed.wrapping_add(u64::from(round) - 1)),
        );
    }
    GameConfig {
        round_count,
        round_duration: config.round_duration,
        custom,
    }
}

/// Feed autopilot input for bot players that control the actor.
fn drive_bots(game: &mut dyn GreenlightGame, bot_ids: &[PlayerId], bot_config: &BotConfig) {
    let state = match rmp_serde::from_slice::<greenlight_redlight::RedLightState>(
        &game.serialize_state(),
    ) {
        Ok(state) => state,
        Err(e) => {
            tracing::debug!(error = %e, "Autopilot could not decode game state");
            return;
        },
    };
    let Some(pid) = state.player_id.filter(|id| bot_ids.contains(id)) else {
        return;
    };
    if let Some(input) = greenlight_redlight::bot::generate_bot_input(&state.session, bot_config)
        && let Ok(data) = rmp_serde::to_vec(&input)
    {
        game.apply_input(pid, &data);
    }
}

fn new_interval(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval
}

/// The single owner of the game value. Every mutation goes through here.
async fn run_game_tick_loop(
    game: &mut dyn GreenlightGame,
    config: SessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<GameCommand>,
    broadcast_tx: mpsc::UnboundedSender<GameBroadcast>,
) {
    let round_count = if config.round_count > 0 {
        config.round_count
    } else {
        game.round_count_hint().max(1)
    };
    let tick_rate = match config.tick_rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => game.tick_rate(),
    };
    let tick_interval = Duration::from_secs_f32(1.0 / tick_rate);
    let bot_ids: Vec<PlayerId> = config
        .players
        .iter()
        .filter(|p| p.is_bot)
        .map(|p| p.id)
        .collect();

    let mut current_round: u8 = 1;
    game.init(&config.players, &round_config(&config, round_count, current_round));
    let _ = broadcast_tx.send(GameBroadcast::Started {
        round: current_round,
        players: config.players.clone(),
    });
    tracing::info!(
        game = %game.metadata().name,
        round_count,
        tick_rate,
        players = config.players.len(),
        "Game session started"
    );

    let mut interval = new_interval(tick_interval);
    let mut tick: u32 = 0;
    let mut paused = false;
    let mut cumulative_scores: HashMap<PlayerId, i32> = HashMap::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if paused {
                    continue;
                }
                if let Some(bot_config) = &config.autopilot
                    && !bot_ids.is_empty()
                {
                    drive_bots(game, &bot_ids, bot_config);
                }

                tick += 1;
                let events = game.update(1.0 / tick_rate);

                let _ = broadcast_tx.send(GameBroadcast::State {
                    tick,
                    state: Bytes::from(game.serialize_state()),
                });
                for event in &events {
                    let _ = broadcast_tx.send(GameBroadcast::Event(event.clone()));
                }

                if !game.is_round_complete() {
                    continue;
                }

                let results = game.round_results();
                for s in &results {
                    *cumulative_scores.entry(s.player_id).or_insert(0) += s.score;
                }
                tracing::info!(round = current_round, ?results, "Round complete");
                let _ = broadcast_tx.send(GameBroadcast::RoundEnd {
                    round: current_round,
                    scores: results,
                });

                if current_round >= round_count {
                    let mut final_scores: Vec<PlayerScore> = cumulative_scores
                        .iter()
                        .map(|(&player_id, &score)| PlayerScore { player_id, score })
                        .collect();
                    final_scores.sort_by_key(|s| s.player_id);
                    let _ = broadcast_tx.send(GameBroadcast::GameEnd { final_scores });
                    break;
                }

                // Pause between rounds (drain commands but don't tick)
                let pause_end = tokio::time::Instant::now() + config.between_round_duration;
                loop {
                    tokio::select! {
                        cmd = cmd_rx.recv() => {
                            match cmd {
                                Some(GameCommand::Stop) | None => {
                                    let _ = broadcast_tx.send(GameBroadcast::GameEnded);
                                    return;
                                },
                                Some(other) => {
                                    tracing::debug!(?other, "Dropped command between rounds");
                                },
                            }
                        }
                        _ = tokio::time::sleep_until(pause_end) => {
                            break;
                        }
                    }
                }

                current_round += 1;
                tick = 0;
                paused = false;
                game.init(&config.players, &round_config(&config, round_count, current_round));
                let _ = broadcast_tx.send(GameBroadcast::Started {
                    round: current_round,
                    players: config.players.clone(),
                });
                interval = new_interval(tick_interval);
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(GameCommand::PlayerInput { player_id, input_data }) => {
                        game.apply_input(player_id, &input_data);
                    },
                    Some(GameCommand::Pause) => {
                        if !paused {
                            game.pause();
                            paused = true;
                            tracing::info!(round = current_round, "Game paused");
                        }
                    },
                    Some(GameCommand::Resume) => {
                        if paused {
                            game.resume();
                            paused = false;
                            tracing::info!(round = current_round, "Game resumed");
                        }
                    },
                    Some(GameCommand::Restart) => {
                        game.reset();
                        game.init(&config.players, &round_config(&config, round_count, current_round));
                        tick = 0;
                        paused = false;
                        tracing::info!(round = current_round, "Round restarted");
                        let _ = broadcast_tx.send(GameBroadcast::Started {
                            round: current_round,
                            players: config.players.clone(),
                        });
                    },
                    Some(GameCommand::Stop) | None => {
                        break;
                    },
                }
            }
        }
    }

    let _ = broadcast_tx.send(GameBroadcast::GameEnded);
}
