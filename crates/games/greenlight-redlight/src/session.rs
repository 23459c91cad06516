use rand::Rng;
use serde::{Deserialize, Serialize};

use greenlight_core::events::{EliminationCause, GameEvent, LightColor};

use crate::config::SessionRules;
use crate::light::LightCycle;
use crate::movement::{MoveDirection, Movement};
use crate::{progress, violation};

/// The single authoritative game-state record for one playthrough.
///
/// Every mutation goes through the methods below. Terminal transitions
/// always clear movement, so a finished session never reports a moving actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    is_playing: bool,
    /// Set by `stop()` so `resume()` knows there is a round to go back to.
    paused: bool,
    is_game_over: bool,
    has_won: bool,
    movement: Movement,
    position: f32,
    lateral: f32,
    light: LightCycle,
    round_time: f32,
    elimination: Option<EliminationCause>,
    rules: SessionRules,
}

impl GameSession {
    /// A session that is not playing yet.
    pub fn new(rules: SessionRules) -> Self {
        Self {
            is_playing: false,
            paused: false,
            is_game_over: false,
            has_won: false,
            movement: Movement::default(),
            position: rules.start_position,
            lateral: 0.0,
            light: LightCycle::default(),
            round_time: 0.0,
            elimination: None,
            rules,
        }
    }

    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    /// Playing and not over: the only state in which the session ticks.
    pub fn is_active(&self) -> bool {
        self.is_playing && !self.is_game_over
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_moving()
    }

    pub fn move_direction(&self) -> MoveDirection {
        self.movement.direction()
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn lateral(&self) -> f32 {
        self.lateral
    }

    pub fn light(&self) -> &LightCycle {
        &self.light
    }

    pub fn is_light_red(&self) -> bool {
        self.light.color().is_red()
    }

    pub fn round_time(&self) -> f32 {
        self.round_time
    }

    pub fn elimination(&self) -> Option<EliminationCause> {
        self.elimination
    }

    /// Fraction of the track covered, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        progress::progress_fraction(
            self.position,
            self.rules.start_position,
            self.rules.finish_line,
        )
    }

    /// Fraction of the time limit still left. Zero without a limit.
    pub fn time_left_fraction(&self) -> f32 {
        match self.rules.time_limit() {
            Some(limit) => ((limit - self.round_time) / limit).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    /// Start a round: playing, no outcome, actor at the start line, light green.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.is_playing = true;
        self.paused = false;
        self.is_game_over = false;
        self.has_won = false;
        self.elimination = None;
        self.movement.end();
        self.position = self.rules.start_position;
        self.lateral = 0.0;
        self.round_time = 0.0;
        self.light.restart(&self.rules.light, rng);
        tracing::debug!(
            dwell = self.light.dwell_target(),
            "Session started on green"
        );
    }

    /// Hard reset to the values of a fresh session. Rules are kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.rules.clone());
    }

    /// Freeze the session. The light keeps its elapsed time.
    pub fn stop(&mut self) {
        if self.is_active() {
            self.is_playing = false;
            self.paused = true;
        }
    }

    /// Continue after `stop()`. A no-op for sessions that never started or are over.
    pub fn resume(&mut self) {
        if self.paused && !self.is_game_over {
            self.is_playing = true;
            self.paused = false;
        }
    }

    /// Input layer: start moving in `direction`.
    pub fn begin_move(&mut self, direction: MoveDirection) {
        if !self.is_active() {
            return;
        }
        self.movement.begin(direction);
    }

    /// Input layer: stop moving. Allowed while paused so a release is never lost.
    pub fn end_move(&mut self) {
        if self.is_game_over {
            return;
        }
        self.movement.end();
    }

    /// Delta the session would actually simulate for a host frame delta.
    /// `None` for deltas that must be ignored.
    pub fn effective_delta(&self, delta: f32) -> Option<f32> {
        if !delta.is_finite() || delta <= 0.0 {
            return None;
        }
        Some(delta.min(self.rules.max_frame_delta))
    }

    /// Advance one frame.
    ///
    /// The light flips and the violation check run before any movement is
    /// integrated, so a move cannot slip past a red transition in the same tick.
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> Vec<GameEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        let Some(dt) = self.effective_delta(delta) else {
            return Vec::new();
        };
        if dt < delta {
            tracing::debug!(delta, clamped = dt, "Clamped oversized frame delta");
        }

        let mut events = Vec::new();
        self.round_time += dt;

        if let Some(color) = self.light.advance(dt, &self.rules.light, rng) {
            events.push(GameEvent::LightChanged { light: color });
            if violation::on_light_changed(color, self.is_moving(), self.is_game_over) {
                self.eliminate(EliminationCause::CaughtMoving, &mut events);
                return events;
            }
        }

        if violation::on_red_tick(
            self.rules.detection,
            self.light.color(),
            self.is_moving(),
            self.is_game_over,
        ) {
            self.eliminate(EliminationCause::CaughtMoving, &mut events);
            return events;
        }

        if let Some(limit) = self.rules.time_limit()
            && self.round_time >= limit
        {
            self.eliminate(EliminationCause::TimeExpired, &mut events);
            return events;
        }

        if self.is_moving() && !self.is_light_red() {
            let (forward, sideways) =
                self.movement
                    .displacement(self.rules.move_speed, self.rules.lateral_speed, dt);
            let half_width = self.rules.field_half_width;
            self.lateral = (self.lateral + sideways).clamp(-half_width, half_width);
            if self.move_direction().changes_progress() {
                let position = (self.position + forward).max(self.rules.start_position);
                self.update_position(position, &mut events);
            }
        }

        events
    }

    /// Host-driven position update. Runs the win check.
    pub fn set_position(&mut self, position: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_active() && position.is_finite() {
            self.update_position(position, &mut events);
        }
        events
    }

    pub fn light_color(&self) -> LightColor {
        self.light.color()
    }

    fn update_position(&mut self, position: f32, events: &mut Vec<GameEvent>) {
        self.position = position;
        if progress::on_position_updated(position, self.rules.finish_line, self.is_game_over) {
            self.is_game_over = true;
            self.has_won = true;
            self.movement.end();
            tracing::info!(
                position,
                round_time = self.round_time,
                "Player reached the finish line"
            );
            events.push(GameEvent::PlayerWon);
        }
    }

    fn eliminate(&mut self, cause: EliminationCause, events: &mut Vec<GameEvent>) {
        if self.is_game_over {
            return;
        }
        self.is_game_over = true;
        self.has_won = false;
        self.elimination = Some(cause);
        self.movement.end();
        tracing::info!(
            ?cause,
            position = self.position,
            round_time = self.round_time,
            "Player eliminated"
        );
        events.push(GameEvent::PlayerEliminated { cause });
    }
}
