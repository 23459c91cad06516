//! The crowd of computer-controlled contestants sharing the field.
//!
//! Contestants follow the same light but are simulated loosely: they only
//! walk on green, and a walker at the red flip is caught with a configurable
//! chance. They never affect the player's outcome.

use rand::Rng;
use serde::{Deserialize, Serialize};

use greenlight_core::events::{GameEvent, LightColor};

use crate::config::{ContestantConfig, SessionRules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: u32,
    pub position: f32,
    pub lateral: f32,
    pub base_speed: f32,
    pub moving: bool,
    pub eliminated: bool,
    pub finished: bool,
}

impl Contestant {
    pub fn is_active(&self) -> bool {
        !self.eliminated && !self.finished
    }
}

/// Spawn the crowd behind the start line, spread across the field.
pub fn spawn_contestants<R: Rng + ?Sized>(
    config: &ContestantConfig,
    rules: &SessionRules,
    rng: &mut R,
) -> Vec<Contestant> {
    let half_width = rules.field_half_width.max(0.0);
    (0..config.count)
        .map(|id| {
            let behind = if config.spread > 0.0 {
                rng.random_range(0.0..config.spread)
            } else {
                0.0
            };
            let lateral = if half_width > 0.0 {
                rng.random_range(-half_width..half_width)
            } else {
                0.0
            };
            Contestant {
                id,
                position: rules.start_position - behind,
                lateral,
                base_speed: config.base_speed + id as f32 * config.speed_step,
                moving: false,
                eliminated: false,
                finished: false,
            }
        })
        .collect()
}

fn probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Advance every active contestant by `dt`.
///
/// `light_changed` carries the new color when the light flipped this tick.
pub fn update_contestants<R: Rng + ?Sized>(
    contestants: &mut [Contestant],
    light: LightColor,
    light_changed: Option<LightColor>,
    dt: f32,
    config: &ContestantConfig,
    finish_line: f32,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let caught_chance = probability(config.caught_chance);
    let move_chance = probability(config.move_chance);
    let jitter = config.speed_jitter.abs();

    for c in contestants.iter_mut().filter(|c| c.is_active()) {
        if light_changed == Some(LightColor::Red) && c.moving {
            c.moving = false;
            if rng.random_bool(caught_chance) {
                c.eliminated = true;
                tracing::debug!(contestant_id = c.id, "Contestant caught moving");
                events.push(GameEvent::ContestantEliminated {
                    contestant_id: c.id,
                });
                continue;
            }
        }

        if light.is_red() {
            c.moving = false;
            continue;
        }

        c.moving = rng.random_bool(move_chance);
        if !c.moving {
            continue;
        }
        let factor = if jitter > 0.0 {
            rng.random_range((1.0 - jitter)..(1.0 + jitter))
        } else {
            1.0
        };
        c.position += c.base_speed * factor * dt;
        if c.position >= finish_line {
            c.position = finish_line;
            c.finished = true;
            c.moving = false;
            events.push(GameEvent::ContestantFinished {
                contestant_id: c.id,
            });
        }
    }

    events
}
