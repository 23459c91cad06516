use rand::Rng;
use serde::{Deserialize, Serialize};

use greenlight_core::events::LightColor;

use crate::config::LightTiming;

/// The doll's light: a two-state timer with randomized dwell durations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightCycle {
    color: LightColor,
    /// Seconds spent in the current color.
    elapsed: f32,
    /// Seconds the current color lasts. Zero until the cycle is restarted.
    dwell_target: f32,
}

impl LightCycle {
    pub fn color(&self) -> LightColor {
        self.color
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn dwell_target(&self) -> f32 {
        self.dwell_target
    }

    /// Seconds until the next flip.
    pub fn remaining(&self) -> f32 {
        (self.dwell_target - self.elapsed).max(0.0)
    }

    /// Go back to green with a fresh green dwell.
    pub fn restart<R: Rng + ?Sized>(&mut self, timing: &LightTiming, rng: &mut R) {
        self.color = LightColor::Green;
        self.elapsed = 0.0;
        self.dwell_target = timing.green.sample(rng);
    }

    /// Advance the timer by `dt` seconds. Returns the new color when the
    /// light flipped during this step.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        timing: &LightTiming,
        rng: &mut R,
    ) -> Option<LightColor> {
        self.elapsed += dt;
        if self.elapsed < self.dwell_target {
            return None;
        }
        self.color = self.color.flipped();
        self.elapsed = 0.0;
        self.dwell_target = timing.dwell_for(self.color).sample(rng);
        Some(self.color)
    }
}
