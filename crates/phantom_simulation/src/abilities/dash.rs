//! Phantom dash: teleport-like straight travel to the aim point.

use bevy::prelude::*;

use crate::effects::EffectHandle;

/// Active dash: `Armed → Active → Complete`.
///
/// Duration = distance / speed, поэтому скорость прохождения постоянна
/// независимо от дальности.
#[derive(Debug, Clone, PartialEq)]
pub struct DashState {
    pub start: Vec3,
    pub end: Vec3,
    /// Total travel time (seconds)
    pub duration: f32,
    /// Elapsed time (seconds)
    pub timer: f32,
    /// Trail attached to the rotation base while dashing
    pub trail: Option<EffectHandle>,
}

/// Result of one dash tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashStep {
    pub position: Vec3,
    pub finished: bool,
}

impl DashState {
    /// `speed` must be positive (config validation guarantees it).
    pub fn new(start: Vec3, end: Vec3, speed: f32) -> Self {
        let duration = if speed > 0.0 {
            start.distance(end) / speed
        } else {
            0.0
        };

        Self {
            start,
            end,
            duration,
            timer: 0.0,
            trail: None,
        }
    }

    pub fn with_trail(mut self, trail: EffectHandle) -> Self {
        self.trail = Some(trail);
        self
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.timer / self.duration).clamp(0.0, 1.0)
    }

    /// Advances the timer and returns the interpolated position.
    ///
    /// On the finishing tick the position is exactly `end` (no lerp
    /// rounding), so the dash always lands on the recorded aim point.
    pub fn advance(&mut self, dt: f32) -> DashStep {
        self.timer += dt.max(0.0);

        let t = self.progress();
        if t >= 1.0 {
            return DashStep {
                position: self.end,
                finished: true,
            };
        }

        DashStep {
            position: self.start.lerp(self.end, t),
            finished: false,
        }
    }
}
