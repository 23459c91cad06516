pub mod bot;
pub mod config;
pub mod contestants;
pub mod light;
pub mod movement;
pub mod progress;
pub mod scoring;
pub mod session;
pub mod violation;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use greenlight_core::events::{GameEvent, LightColor};
use greenlight_core::game_trait::{
    GameConfig, GameMetadata, GreenlightGame, PlayerId, PlayerScore,
};
use greenlight_core::greenlight_game_boilerplate;
use greenlight_core::player::{Player, controlling_player};

use config::{DetectionMode, RedLightConfig};
use contestants::Contestant;
use movement::MoveDirection;
use session::GameSession;

/// Input from the controlling player: the direction held, or
/// `MoveDirection::None` when every movement key is released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedLightInput {
    pub direction: MoveDirection,
}

impl RedLightInput {
    pub fn go(direction: MoveDirection) -> Self {
        Self { direction }
    }

    pub fn stop() -> Self {
        Self {
            direction: MoveDirection::None,
        }
    }
}

/// Serializable game state for broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedLightState {
    pub session: GameSession,
    pub contestants: Vec<Contestant>,
    pub round_complete: bool,
    /// The player bound to the actor for this round.
    pub player_id: Option<PlayerId>,
}

/// Red Light, Green Light.
pub struct RedLightGreenLight {
    state: RedLightState,
    pending_inputs: Vec<RedLightInput>,
    game_config: RedLightConfig,
    rng: StdRng,
}

impl RedLightGreenLight {
    pub fn new() -> Self {
        Self::with_config(RedLightConfig::load())
    }

    pub fn with_config(config: RedLightConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            state: RedLightState {
                session: GameSession::new(config.session.clone()),
                contestants: Vec::new(),
                round_complete: false,
                player_id: None,
            },
            pending_inputs: Vec::new(),
            game_config: config,
            rng,
        }
    }

    pub fn state(&self) -> &RedLightState {
        &self.state
    }

    pub fn config(&self) -> &RedLightConfig {
        &self.game_config
    }

    /// Host-driven position update for the actor.
    pub fn set_position(&mut self, position: f32) -> Vec<GameEvent> {
        let mut events = self.state.session.set_position(position);
        self.finish_round_if_over(&mut events);
        events
    }

    fn apply_pending_inputs(&mut self) {
        for input in self.pending_inputs.drain(..) {
            match input.direction {
                MoveDirection::None => self.state.session.end_move(),
                direction => self.state.session.begin_move(direction),
            }
        }
    }

    fn finish_round_if_over(&mut self, events: &mut Vec<GameEvent>) {
        if self.state.session.is_game_over() && !self.state.round_complete {
            self.state.round_complete = true;
            self.pending_inputs.clear();
            events.push(GameEvent::RoundComplete);
        }
    }
}

impl Default for RedLightGreenLight {
    fn default() -> Self {
        Self::with_config(RedLightConfig::default())
    }
}

/// Per-round overrides carried in `GameConfig::custom`.
fn round_seed(config: &GameConfig) -> Option<u64> {
    config.custom.get("seed").and_then(|v| v.as_u64())
}

fn round_detection(config: &GameConfig) -> Option<DetectionMode> {
    let value = config.custom.get("detection")?;
    match serde_json::from_value::<DetectionMode>(value.clone()) {
        Ok(mode) => Some(mode),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring invalid detection override");
            None
        },
    }
}

impl GreenlightGame for RedLightGreenLight {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Red Light, Green Light".to_string(),
            description: "Walk on green, freeze on red. Reach the finish line without getting caught."
                .to_string(),
            min_players: 1,
            max_players: 8,
            estimated_round_duration: Duration::from_secs(60),
        }
    }

    fn tick_rate(&self) -> f32 {
        self.game_config.tick_rate_hz
    }

    fn round_count_hint(&self) -> u8 {
        self.game_config.round_count
    }

    fn init(&mut self, players: &[Player], config: &GameConfig) {
        if let Some(seed) = round_seed(config).or(self.game_config.seed) {
            self.rng = StdRng::seed_from_u64(seed);
        }

        let mut rules = self.game_config.session.clone();
        if let Some(mode) = round_detection(config) {
            rules.detection = mode;
        }
        if !config.round_duration.is_zero() {
            rules.time_limit_secs = config.round_duration.as_secs_f32();
        }

        let mut session = GameSession::new(rules);
        session.start(&mut self.rng);
        let contestants = contestants::spawn_contestants(
            &self.game_config.contestants,
            session.rules(),
            &mut self.rng,
        );
        let player_id = controlling_player(players).map(|p| p.id);

        tracing::info!(
            ?player_id,
            contestants = contestants.len(),
            detection = ?session.rules().detection,
            time_limit = session.rules().time_limit_secs,
            "Red Light, Green Light round started"
        );

        self.state = RedLightState {
            session,
            contestants,
            round_complete: false,
            player_id,
        };
        self.pending_inputs.clear();
    }

    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.state.round_complete || !self.state.session.is_active() {
            return Vec::new();
        }

        self.apply_pending_inputs();
        let mut events = self.state.session.tick(dt, &mut self.rng);

        if let Some(step) = self.state.session.effective_delta(dt) {
            let light_changed = events.iter().rev().find_map(|e| match e {
                GameEvent::LightChanged { light } => Some(*light),
                _ => None,
            });
            let light: LightColor = self.state.session.light_color();
            events.extend(contestants::update_contestants(
                &mut self.state.contestants,
                light,
                light_changed,
                step,
                &self.game_config.contestants,
                self.state.session.rules().finish_line,
                &mut self.rng,
            ));
        }

        self.finish_round_if_over(&mut events);
        events
    }

    greenlight_game_boilerplate!(state_type: RedLightState);

    fn apply_input(&mut self, player_id: PlayerId, input: &[u8]) {
        if self.state.player_id != Some(player_id) {
            tracing::debug!(player_id, "Ignored input from non-controlling player");
            return;
        }
        if self.state.round_complete {
            tracing::debug!(player_id, "Ignored input after round end");
            return;
        }
        match rmp_serde::from_slice::<RedLightInput>(input) {
            Err(e) => {
                tracing::debug!(player_id, error = %e, "Dropped malformed red light input");
            },
            Ok(ri) => self.pending_inputs.push(ri),
        }
    }

    fn pause(&mut self) {
        self.state.session.stop();
    }

    fn resume(&mut self) {
        self.state.session.resume();
    }

    fn reset(&mut self) {
        self.state.session.reset();
        self.state.contestants.clear();
        self.state.round_complete = false;
        self.state.player_id = None;
        self.pending_inputs.clear();
    }

    fn round_results(&self) -> Vec<PlayerScore> {
        let session = &self.state.session;
        self.state
            .player_id
            .map(|pid| PlayerScore {
                player_id: pid,
                score: scoring::calculate_score(
                    session.has_won(),
                    session.progress(),
                    session.time_left_fraction(),
                ),
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::{DwellRange, LightTiming};
    use greenlight_core::events::EliminationCause;
    use greenlight_core::test_helpers::{default_config, make_players, run_game_ticks};

    fn fixed_config() -> RedLightConfig {
        let mut config = RedLightConfig {
            seed: Some(7),
            ..RedLightConfig::default()
        };
        config.session.light = LightTiming {
            green: DwellRange::new(5.0, 5.0),
            red: DwellRange::new(2.0, 2.0),
        };
        config
    }

    fn encode(input: RedLightInput) -> Vec<u8> {
        rmp_serde::to_vec(&input).unwrap()
    }

    fn started(config: RedLightConfig) -> RedLightGreenLight {
        let mut game = RedLightGreenLight::with_config(config);
        game.init(&make_players(2), &default_config(0));
        game
    }

    #[test]
    fn init_binds_first_player() {
        let game = started(fixed_config());
        assert_eq!(game.state.player_id, Some(1));
        assert!(game.state.session.is_playing());
        assert_eq!(game.state.contestants.len(), 8);
        assert!(!game.state.round_complete);
    }

    #[test]
    fn tick_rate_from_config() {
        let game = RedLightGreenLight::with_config(fixed_config());
        assert_eq!(game.tick_rate(), 30.0);
    }

    #[test]
    fn spectator_input_ignored() {
        let mut game = started(fixed_config());
        game.apply_input(2, &encode(RedLightInput::go(MoveDirection::Forward)));
        assert!(game.pending_inputs.is_empty());
    }

    #[test]
    fn malformed_input_dropped() {
        let mut game = started(fixed_config());
        game.apply_input(1, &[0xc1, 0xff]);
        assert!(game.pending_inputs.is_empty());
    }

    #[test]
    fn inputs_applied_in_order() {
        let mut game = started(fixed_config());
        game.apply_input(1, &encode(RedLightInput::go(MoveDirection::Forward)));
        game.apply_input(1, &encode(RedLightInput::stop()));
        game.update(0.1);
        assert!(!game.state.session.is_moving());
        assert_eq!(game.state.session.position(), 0.0);
    }

    #[test]
    fn walking_into_red_completes_round() {
        let mut game = started(fixed_config());
        game.apply_input(1, &encode(RedLightInput::go(MoveDirection::Forward)));

        let mut events = Vec::new();
        for _ in 0..100 {
            events.extend(game.update(0.1));
            if game.is_round_complete() {
                break;
            }
        }
        assert!(game.is_round_complete());
        assert_eq!(
            game.state.session.elimination(),
            Some(EliminationCause::CaughtMoving)
        );
        let terminal: Vec<&GameEvent> = events.iter().filter(|e| e.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![&GameEvent::PlayerEliminated {
                cause: EliminationCause::CaughtMoving
            }]
        );
        assert_eq!(events.last(), Some(&GameEvent::RoundComplete));
        assert!(game.update(0.1).is_empty());
    }

    #[test]
    fn reaching_finish_wins_and_scores() {
        let mut config = fixed_config();
        config.session.finish_line = 4.0;
        let mut game = started(config);
        game.apply_input(1, &encode(RedLightInput::go(MoveDirection::Forward)));

        let events = run_game_ticks(&mut game, 20, 0.1);
        assert!(events.contains(&GameEvent::PlayerWon));
        assert!(game.state.session.has_won());
        let results = game.round_results();
        assert_eq!(
            results,
            vec![PlayerScore {
                player_id: 1,
                score: scoring::WIN_POINTS
            }]
        );
    }

    #[test]
    fn set_position_past_finish_wins() {
        let mut game = started(fixed_config());
        let events = game.set_position(40.0);
        assert_eq!(events, vec![GameEvent::PlayerWon, GameEvent::RoundComplete]);
        assert!(game.set_position(50.0).is_empty());
    }

    #[test]
    fn round_duration_becomes_time_limit() {
        let mut game = RedLightGreenLight::with_config(fixed_config());
        game.init(&make_players(1), &default_config(2));
        assert_eq!(game.state.session.rules().time_limit(), Some(2.0));

        let mut events = Vec::new();
        for _ in 0..30 {
            events.extend(game.update(0.1));
        }
        assert!(events.contains(&GameEvent::PlayerEliminated {
            cause: EliminationCause::TimeExpired
        }));
        assert!(game.is_round_complete());
    }

    #[test]
    fn custom_overrides_detection_and_seed() {
        let mut custom = HashMap::new();
        custom.insert("detection".to_string(), serde_json::json!("on_transition"));
        custom.insert("seed".to_string(), serde_json::json!(1234));
        let config = GameConfig {
            custom,
            ..GameConfig::default()
        };

        let mut a = RedLightGreenLight::default();
        a.init(&make_players(1), &config);
        let mut b = RedLightGreenLight::default();
        b.init(&make_players(1), &config);

        assert_eq!(
            a.state.session.rules().detection,
            DetectionMode::OnTransition
        );
        assert_eq!(a.state, b.state, "same seed gives the same round");
    }

    #[test]
    fn invalid_detection_override_ignored() {
        let mut custom = HashMap::new();
        custom.insert("detection".to_string(), serde_json::json!("sometimes"));
        let config = GameConfig {
            custom,
            ..GameConfig::default()
        };
        let mut game = RedLightGreenLight::with_config(fixed_config());
        game.init(&make_players(1), &config);
        assert_eq!(
            game.state.session.rules().detection,
            DetectionMode::Continuous
        );
    }

    #[test]
    fn eliminated_player_scores_progress() {
        let mut game = started(fixed_config());
        game.state.session.set_position(20.0);
        game.apply_input(1, &encode(RedLightInput::go(MoveDirection::Left)));
        for _ in 0..100 {
            game.update(0.1);
        }
        assert!(game.is_round_complete());
        assert_eq!(game.round_results()[0].score, 2);
    }

    #[test]
    fn input_after_round_end_is_dropped() {
        let mut game = started(fixed_config());
        game.apply_input(1, &encode(RedLightInput::go(MoveDirection::Forward)));
        game.set_position(40.0);
        assert!(game.is_round_complete());
        assert!(game.pending_inputs.is_empty(), "queue cleared at round end");

        for _ in 0..10 {
            game.apply_input(1, &encode(RedLightInput::go(MoveDirection::Forward)));
            game.update(0.1);
        }
        assert!(game.pending_inputs.is_empty());
    }

    #[test]
    fn reset_clears_round() {
        let mut game = started(fixed_config());
        game.update(0.1);
        game.reset();
        assert!(game.state.contestants.is_empty());
        assert_eq!(game.state.player_id, None);
        assert!(!game.state.session.is_playing());
        assert!(game.round_results().is_empty());
    }

    mod contract {
        use super::*;
        use greenlight_core::test_helpers::*;

        fn game() -> RedLightGreenLight {
            RedLightGreenLight::with_config(fixed_config())
        }

        #[test]
        fn init_creates_player_state() {
            contract_init_creates_player_state(&mut game(), 1);
        }

        #[test]
        fn apply_input_changes_state() {
            let mut g = game();
            g.init(&make_players(1), &default_config(90));
            contract_apply_input_changes_state(
                &mut g,
                &encode(RedLightInput::go(MoveDirection::Forward)),
                1,
            );
        }

        #[test]
        fn update_advances_time() {
            let mut g = game();
            g.init(&make_players(1), &default_config(90));
            contract_update_advances_time(&mut g);
        }

        #[test]
        fn round_eventually_completes() {
            let mut g = game();
            g.init(&make_players(1), &default_config(90));
            contract_round_eventually_completes(&mut g, 500);
        }

        #[test]
        fn state_roundtrip_preserves() {
            let mut g = game();
            g.init(&make_players(2), &default_config(90));
            g.update(0.1);
            contract_state_roundtrip_preserves(&mut g);
        }

        #[test]
        fn pause_stops_updates() {
            let mut g = game();
            g.init(&make_players(1), &default_config(90));
            contract_pause_stops_updates(&mut g);
        }

        #[test]
        fn reset_stops_round() {
            let mut g = game();
            g.init(&make_players(1), &default_config(90));
            g.update(0.1);
            contract_reset_stops_round(&mut g);
        }

        #[test]
        fn round_results_complete() {
            let mut g = game();
            g.init(&make_players(3), &default_config(90));
            g.set_position(40.0);
            contract_round_results_complete(&g, 1);
        }
    }
}
