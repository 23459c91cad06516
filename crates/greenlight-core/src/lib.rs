pub mod events;
pub mod game_trait;
pub mod player;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::events::GameEvent;
    use crate::game_trait::{GameConfig, GreenlightGame, PlayerId, PlayerScore};
    use crate::player::Player;

    /// Create `n` test players with sequential IDs starting at 1.
    pub fn make_players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(i as PlayerId + 1, format!("Player{}", i + 1)))
            .collect()
    }

    /// Create a default GameConfig with the given round duration in seconds.
    pub fn default_config(round_duration_secs: u64) -> GameConfig {
        GameConfig {
            round_count: 1,
            round_duration: Duration::from_secs(round_duration_secs),
            custom: HashMap::new(),
        }
    }

    /// Run N game ticks, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn GreenlightGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt));
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn GreenlightGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every GreenlightGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete game instance.

    /// After init() with N players, serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_player_state(game: &mut dyn GreenlightGame, player_count: usize) {
        let players = make_players(player_count);
        let config = default_config(90);
        game.init(&players, &config);
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// apply_input() with valid data followed by update() must change state.
    pub fn contract_apply_input_changes_state(
        game: &mut dyn GreenlightGame,
        valid_input: &[u8],
        player_id: PlayerId,
    ) {
        let before = game.serialize_state();
        game.apply_input(player_id, valid_input);
        game.update(0.1);
        assert_game_state_changed(game, &before);
    }

    /// update() with dt>0 must advance the round timer.
    pub fn contract_update_advances_time(game: &mut dyn GreenlightGame) {
        let before = game.serialize_state();
        game.update(1.0);
        let after = game.serialize_state();
        assert_ne!(
            before, after,
            "update(dt>0) must advance game state (timer)"
        );
    }

    /// Running update() enough times must eventually reach is_round_complete().
    pub fn contract_round_eventually_completes(game: &mut dyn GreenlightGame, max_ticks: usize) {
        for _ in 0..max_ticks {
            game.update(1.0);
            if game.is_round_complete() {
                return;
            }
        }
        assert!(
            game.is_round_complete(),
            "Game must complete after {max_ticks} ticks of 1s each"
        );
    }

    /// serialize_state → apply_state roundtrip must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn GreenlightGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        game.apply_state(&state_b);
        let state_c = game.serialize_state();
        assert_eq!(
            state_b, state_c,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// pause() must freeze the game, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn GreenlightGame) {
        game.pause();
        let before = game.serialize_state();
        game.update(1.0);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(1.0);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// reset() must leave a game that neither ticks nor reports completion.
    pub fn contract_reset_stops_round(game: &mut dyn GreenlightGame) {
        game.reset();
        assert!(
            !game.is_round_complete(),
            "A freshly reset game must not be complete"
        );
        let before = game.serialize_state();
        let events = game.update(1.0);
        assert!(events.is_empty(), "A reset game must not emit events");
        assert_eq!(
            before,
            game.serialize_state(),
            "A reset game must not tick until init"
        );
    }

    /// round_results() must return an entry for each controlling player.
    pub fn contract_round_results_complete(
        game: &dyn GreenlightGame,
        expected_players: usize,
    ) -> Vec<PlayerScore> {
        let results = game.round_results();
        assert_eq!(
            results.len(),
            expected_players,
            "round_results must have one entry per controlling player"
        );
        results
    }
}
