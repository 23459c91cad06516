use serde::{Deserialize, Serialize};

/// Direction the actor is trying to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    #[default]
    None,
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveDirection {
    /// Forward and backward change progress; left and right only sidestep.
    pub fn changes_progress(self) -> bool {
        matches!(self, Self::Forward | Self::Backward)
    }
}

/// Whether the actor is moving, and which way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    is_moving: bool,
    direction: MoveDirection,
}

impl Movement {
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn direction(&self) -> MoveDirection {
        self.direction
    }

    /// Start (or keep) moving. `MoveDirection::None` stops instead.
    pub fn begin(&mut self, direction: MoveDirection) {
        if direction == MoveDirection::None {
            self.end();
            return;
        }
        self.is_moving = true;
        self.direction = direction;
    }

    pub fn end(&mut self) {
        self.is_moving = false;
        self.direction = MoveDirection::None;
    }

    /// Displacement for one step as (forward, sideways).
    pub fn displacement(&self, forward_speed: f32, lateral_speed: f32, dt: f32) -> (f32, f32) {
        if !self.is_moving {
            return (0.0, 0.0);
        }
        match self.direction {
            MoveDirection::None => (0.0, 0.0),
            MoveDirection::Forward => (forward_speed * dt, 0.0),
            MoveDirection::Backward => (-forward_speed * dt, 0.0),
            MoveDirection::Left => (0.0, -lateral_speed * dt),
            MoveDirection::Right => (0.0, lateral_speed * dt),
        }
    }
}
