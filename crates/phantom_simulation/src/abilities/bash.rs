//! Briefcase bash: eased spin of the rotation base with a rising weapon.
//!
//! Фазы: `WindUp (timer < delay) → Active (hit-checking) → Complete`.
//! Состояние чистое: overlap query и уведомление врагов делает контроллер
//! по `BashPose::hit_window_open`.

use bevy::prelude::*;

use crate::combat::HitPolicy;
use crate::config::BashConfig;
use crate::effects::EffectHandle;
use crate::physics::ColliderId;

#[derive(Debug, Clone, PartialEq)]
pub struct BashState {
    /// Elapsed time (seconds)
    pub timer: f32,
    /// Rotation-base orientation when the bash started
    pub initial_rotation: Quat,
    pub trail: Option<EffectHandle>,
    /// Trail activated (happens once, when the hit window opens)
    pub trail_active: bool,
    /// Colliders already struck this activation
    pub struck: Vec<ColliderId>,
    /// Total enemy notifications delivered
    pub strikes: u32,
}

/// Pose produced by one bash tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BashPose {
    /// Linear progress in `[0, 1]`
    pub progress: f32,
    /// Progress after the spin curve
    pub eased: f32,
    /// Weapon height above the base
    pub height: f32,
    pub spin_degrees: f32,
    /// New rotation-base orientation
    pub rotation: Quat,
    /// `timer >= delay`: hit volume is live this tick
    pub hit_window_open: bool,
    /// First tick of the hit window
    pub window_just_opened: bool,
    pub finished: bool,
}

impl BashState {
    pub fn new(initial_rotation: Quat) -> Self {
        Self {
            timer: 0.0,
            initial_rotation,
            trail: None,
            trail_active: false,
            struck: Vec::new(),
            strikes: 0,
        }
    }

    pub fn with_trail(mut self, trail: EffectHandle) -> Self {
        self.trail = Some(trail);
        self
    }

    /// Advances the timer and samples spin/height.
    pub fn advance(&mut self, dt: f32, config: &BashConfig) -> BashPose {
        self.timer += dt.max(0.0);

        let progress = if config.duration > 0.0 {
            (self.timer / config.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let eased = config.spin_curve.sample(progress);
        let height = config.height_range.x + (config.height_range.y - config.height_range.x) * eased;
        let spin_degrees = 360.0 * config.rotation_count * eased;
        let rotation = spin_rotation(spin_degrees) * self.initial_rotation;

        let hit_window_open = self.timer >= config.delay;
        let window_just_opened = hit_window_open && !self.trail_active;
        if window_just_opened {
            self.trail_active = true;
        }

        BashPose {
            progress,
            eased,
            height,
            spin_degrees,
            rotation,
            hit_window_open,
            window_just_opened,
            finished: progress >= 1.0,
        }
    }

    /// Records a strike on `collider`; `false` = skip it under `policy`.
    pub fn register_strike(&mut self, collider: ColliderId, policy: HitPolicy) -> bool {
        let seen = self.struck.contains(&collider);
        if seen && policy == HitPolicy::OncePerActivation {
            return false;
        }
        if !seen {
            self.struck.push(collider);
        }
        self.strikes += 1;
        true
    }
}

/// Rotation of `degrees` about world up.
pub fn spin_rotation(degrees: f32) -> Quat {
    Quat::from_axis_angle(Vec3::Y, degrees.to_radians())
}
