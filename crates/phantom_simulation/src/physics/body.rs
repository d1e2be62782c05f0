//! Character body abstraction
//!
//! Архитектура:
//! - Контроллер пишет velocity/impulse/position через [`CharacterBody`]
//! - Интеграцию делает владелец тела (engine или headless [`SimBody`])
//! - `set_collision_enabled(false)` = collider off + kinematic (phantom dash)

use bevy::prelude::*;

pub trait CharacterBody: Send + Sync {
    fn position(&self) -> Vec3;

    /// Teleports the body (used by dash interpolation).
    fn set_position(&mut self, position: Vec3);

    fn linear_velocity(&self) -> Vec3;

    fn set_linear_velocity(&mut self, velocity: Vec3);

    /// Instantaneous impulse (mass-scaled). Kinematic bodies ignore it.
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Toggles collision response; disabled also means kinematic.
    fn set_collision_enabled(&mut self, enabled: bool);

    fn collision_enabled(&self) -> bool;
}

/// Headless rigid body: explicit velocity integration + optional floor.
///
/// Stand-in for the engine body in tests and the headless runner.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SimBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Масса (kg), делит impulse
    pub mass: f32,
    pub collision_enabled: bool,
    /// Lowest height the body center can rest at while colliding
    pub floor_height: Option<f32>,
}

impl Default for SimBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: 1.0,
            collision_enabled: true,
            floor_height: None,
        }
    }
}

impl SimBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_floor(mut self, floor_height: f32) -> Self {
        self.floor_height = Some(floor_height);
        self
    }

    /// `true` while the body sits on its floor plane.
    pub fn resting_on_floor(&self) -> bool {
        self.floor_height
            .is_some_and(|floor| self.collision_enabled && self.position.y <= floor + 1e-4)
    }

    /// Integrates velocity → position: position += velocity * dt.
    ///
    /// Kinematic bodies (collision disabled) are moved only by `set_position`.
    pub fn step(&mut self, delta: f32) {
        if !self.collision_enabled {
            return;
        }

        self.position += self.velocity * delta;

        if let Some(floor) = self.floor_height {
            if self.position.y < floor {
                self.position.y = floor;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }
    }
}

impl CharacterBody for SimBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        if self.collision_enabled && self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }

    fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }

    fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_integrates_velocity() {
        let mut body = SimBody::new(Vec3::ZERO);
        body.velocity = Vec3::new(8.0, 0.0, -4.0);

        let delta = 1.0 / 64.0; // 1 FixedUpdate tick
        body.step(delta);

        assert!((body.position.x - 0.125).abs() < 1e-6);
        assert!((body.position.z + 0.0625).abs() < 1e-6);
    }

    #[test]
    fn test_floor_stops_falling() {
        let mut body = SimBody::new(Vec3::new(0.0, 1.05, 0.0)).with_floor(1.0);
        body.velocity.y = -10.0;

        body.step(0.1);

        assert_eq!(body.position.y, 1.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.resting_on_floor());
    }

    #[test]
    fn test_impulse_scaled_by_mass() {
        let mut body = SimBody::new(Vec3::ZERO).with_mass(2.0);
        body.apply_impulse(Vec3::Y * 10.0);
        assert_eq!(body.velocity, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_kinematic_body_ignores_velocity_and_impulse() {
        let mut body = SimBody::new(Vec3::ZERO);
        body.velocity = Vec3::X;
        body.set_collision_enabled(false);

        body.apply_impulse(Vec3::Y * 10.0);
        body.step(1.0);

        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(body.velocity, Vec3::X);
        assert!(!body.resting_on_floor());

        body.set_position(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(body.position(), Vec3::new(3.0, 0.0, 0.0));
    }
}
