//! Character ability controller
//!
//! # Architecture
//!
//! **Variable tick (`advance`):**
//! - aim point (ray против `CURSOR`)
//! - активная способность (dash lerp / bash spin + hits)
//! - edge-triggered jump / dash / bash
//!
//! **Fixed tick (`fixed_advance`):**
//! - camera-relative velocity (кроме dash)
//! - yaw rotation base на aim point (кроме bash)
//! - gravity (кроме dash)
//!
//! Body и viewpoint принадлежат контроллеру; остальные сервисы приходят
//! на каждый тик через [`ControllerServices`].

pub mod events;
pub mod plugin;


use bevy::prelude::*;

use crate::abilities::{AbilityKind, ActiveAbility, BashState, DashState};
use crate::camera::Viewpoint;
use crate::combat::EnemyRegistry;
use crate::config::ControllerConfig;
use crate::effects::{EffectKind, VisualHost};
use crate::input::{ControlAction, InputSource};
use crate::logger;
use crate::physics::{layers, CharacterBody, PhysicsQueries};

pub use events::{ControllerDiagnostic, ControllerEvent, PlayerControllerEvent};
pub use plugin::{spawn_player, FrameCounter, PlayerController, PlayerControllerPlugin};

/// Per-tick services borrowed from the host.
pub struct ControllerServices<'a> {
    pub physics: &'a dyn PhysicsQueries,
    pub input: &'a dyn InputSource,
    pub visuals: &'a mut dyn VisualHost,
    pub enemies: &'a mut dyn EnemyRegistry,
}

pub struct CharacterAbilityController<B: CharacterBody> {
    body: B,
    viewpoint: Box<dyn Viewpoint>,
    config: ControllerConfig,
    ability: ActiveAbility,
    aim_point: Vec3,
    /// Yaw rig carrying weapon + effects
    base_rotation: Quat,
    /// Weapon height above the base (bash sweep)
    weapon_height: f32,
    gravity_enabled: bool,
    grounded: bool,
    events: Vec<ControllerEvent>,
}

impl<B: CharacterBody> CharacterAbilityController<B> {
    pub fn new(body: B, viewpoint: Box<dyn Viewpoint>, config: ControllerConfig) -> Self {
        let aim_point = body.position();
        let weapon_height = config.bash.height_range.x;
        Self {
            body,
            viewpoint,
            config,
            ability: ActiveAbility::None,
            aim_point,
            base_rotation: Quat::IDENTITY,
            weapon_height,
            gravity_enabled: true,
            grounded: false,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn ability(&self) -> &ActiveAbility {
        &self.ability
    }

    pub fn is_dashing(&self) -> bool {
        self.ability.is_dashing()
    }

    pub fn is_bashing(&self) -> bool {
        self.ability.is_bashing()
    }

    pub fn aim_point(&self) -> Vec3 {
        self.aim_point
    }

    pub fn set_aim_point(&mut self, aim_point: Vec3) {
        self.aim_point = aim_point;
    }

    pub fn base_rotation(&self) -> Quat {
        self.base_rotation
    }

    pub fn set_base_rotation(&mut self, rotation: Quat) {
        self.base_rotation = rotation;
    }

    pub fn weapon_height(&self) -> f32 {
        self.weapon_height
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Result of the last ground probe.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// World-space center of the bash hit volume.
    pub fn hit_volume_center(&self) -> Vec3 {
        let local = Vec3::new(0.0, self.weapon_height, -self.config.bash.hit_box_forward);
        self.body.position() + self.base_rotation * local
    }

    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Variable tick
    // ========================================================================

    pub fn advance(&mut self, dt: f32, services: &mut ControllerServices<'_>) {
        self.update_aim(services.physics, services.input);

        // ability state вынимается на время тика, чтобы не держать borrow self
        self.ability = match std::mem::take(&mut self.ability) {
            ActiveAbility::None => ActiveAbility::None,
            ActiveAbility::Dash(dash) => self.advance_dash(dash, dt, &mut *services.visuals),
            ActiveAbility::Bash(bash) => self.advance_bash(bash, dt, services),
        };

        self.grounded = self.probe_ground(services.physics);

        let input = services.input;
        if input.just_pressed(ControlAction::Jump) {
            self.jump();
        }
        if input.just_pressed(ControlAction::Dash) && !self.is_dashing() {
            self.start_dash(&mut *services.visuals);
        }
        if input.just_pressed(ControlAction::Bash) && !self.is_bashing() {
            self.start_bash(&mut *services.visuals);
        }
    }

    fn update_aim(&mut self, physics: &dyn PhysicsQueries, input: &dyn InputSource) {
        let Some(ray) = self.viewpoint.screen_point_to_ray(input.pointer()) else {
            return;
        };

        // промах → aim point остаётся прежним
        if let Some(hit) = physics.raycast(ray, self.config.movement.max_aim_distance, layers::CURSOR) {
            self.aim_point = hit.point;
        }
    }

    /// Any collider not on the player layer near the ground-check point.
    pub fn probe_ground(&self, physics: &dyn PhysicsQueries) -> bool {
        let movement = &self.config.movement;
        let probe = self.body.position() + movement.ground_check_offset;

        physics
            .overlap_sphere(probe, movement.ground_check_radius, layers::ALL)
            .iter()
            .any(|hit| !hit.layer.intersects(layers::PLAYER))
    }

    fn jump(&mut self) {
        // kinematic body во время dash всё равно игнорирует impulse
        if !self.grounded || self.is_dashing() {
            return;
        }

        let impulse = Vec3::Y * self.config.movement.jump_impulse;
        self.body.apply_impulse(impulse);
        self.grounded = false;
        self.events.push(ControllerEvent::Jumped { impulse });
    }

    // ========================================================================
    // Phantom dash
    // ========================================================================

    pub fn start_dash(&mut self, visuals: &mut dyn VisualHost) {
        if self.reject_if_busy(AbilityKind::Dash) {
            return;
        }

        self.body.set_collision_enabled(false);
        self.body.set_linear_velocity(Vec3::ZERO);
        self.gravity_enabled = false;

        let from = self.body.position();
        let trail = visuals.spawn_effect(EffectKind::DashTrail, Transform::IDENTITY, true);
        visuals.set_model_visible(false);

        let dash = DashState::new(from, self.aim_point, self.config.dash.speed).with_trail(trail);

        logger::log(&format!(
            "Dash started: {:?} → {:?} ({:.3}s)",
            from, dash.end, dash.duration
        ));
        self.events.push(ControllerEvent::DashStarted {
            from,
            to: dash.end,
            duration: dash.duration,
        });
        self.ability = ActiveAbility::Dash(dash);
    }

    fn advance_dash(
        &mut self,
        mut dash: DashState,
        dt: f32,
        visuals: &mut dyn VisualHost,
    ) -> ActiveAbility {
        let step = dash.advance(dt);
        self.body.set_position(step.position);

        if !step.finished {
            return ActiveAbility::Dash(dash);
        }

        self.body.set_collision_enabled(true);
        self.gravity_enabled = true;
        if let Some(trail) = dash.trail {
            // trail доигрывает сам в world space
            visuals.detach_effect(trail);
        }
        visuals.set_model_visible(true);

        logger::log(&format!("Dash completed at {:?}", step.position));
        self.events.push(ControllerEvent::DashCompleted {
            position: step.position,
        });
        ActiveAbility::None
    }

    // ========================================================================
    // Briefcase bash
    // ========================================================================

    pub fn start_bash(&mut self, visuals: &mut dyn VisualHost) {
        if self.reject_if_busy(AbilityKind::Bash) {
            return;
        }

        let bash_config = &self.config.bash;
        let trail_local = Transform::from_translation(Vec3::new(
            0.0,
            bash_config.height_range.x,
            -bash_config.trail_forward,
        ))
        .with_rotation(bash_config.trail_rotation());
        let trail = visuals.spawn_effect(EffectKind::BashTrail, trail_local, false);

        self.weapon_height = bash_config.height_range.x;
        let bash = BashState::new(self.base_rotation).with_trail(trail);

        logger::log("Bash started");
        self.events.push(ControllerEvent::BashStarted);
        self.ability = ActiveAbility::Bash(bash);
    }

    fn advance_bash(
        &mut self,
        mut bash: BashState,
        dt: f32,
        services: &mut ControllerServices<'_>,
    ) -> ActiveAbility {
        let pose = bash.advance(dt, &self.config.bash);
        self.weapon_height = pose.height;
        self.base_rotation = pose.rotation;

        if let Some(trail) = bash.trail {
            let local = Vec3::new(0.0, pose.height, -self.config.bash.trail_forward);
            services.visuals.set_effect_local_position(trail, local);
            if pose.window_just_opened {
                services.visuals.set_effect_active(trail, true);
            }
        }
        if pose.window_just_opened {
            self.events.push(ControllerEvent::BashHitWindowOpened);
        }

        // hits считаются и на последнем тике
        if pose.hit_window_open {
            self.strike_enemies(&mut bash, services);
        }

        if !pose.finished {
            return ActiveAbility::Bash(bash);
        }

        if let Some(trail) = bash.trail {
            services.visuals.stop_emitting(trail);
        }

        logger::log(&format!("Bash completed: {} strikes", bash.strikes));
        self.events.push(ControllerEvent::BashCompleted {
            strikes: bash.strikes,
        });
        ActiveAbility::None
    }

    fn strike_enemies(&mut self, bash: &mut BashState, services: &mut ControllerServices<'_>) {
        let hits = services.physics.overlap_box(
            self.hit_volume_center(),
            self.config.bash.hit_box_half_extents,
            layers::ENEMY,
        );
        let origin = self.body.position();
        let policy = self.config.bash.hit_policy;

        for hit in hits {
            let Some(receiver) = services.enemies.receiver(hit.collider) else {
                logger::log_warning(&format!(
                    "Bash: collider {:?} on layer {} has no attack receiver, skipped",
                    hit.collider,
                    layers::layer_name(hit.layer)
                ));
                self.events.push(ControllerEvent::Diagnostic(
                    ControllerDiagnostic::MissingAttackReceiver {
                        collider: hit.collider,
                    },
                ));
                continue;
            };

            if !bash.register_strike(hit.collider, policy) {
                continue;
            }

            let push = receiver.position() - origin;
            receiver.on_attacked(push);
            self.events.push(ControllerEvent::EnemyStruck {
                collider: hit.collider,
                push,
            });
        }
    }

    /// Emits `AbilityBusy` when another ability holds the slot.
    fn reject_if_busy(&mut self, requested: AbilityKind) -> bool {
        let Some(active) = self.ability.kind() else {
            return false;
        };

        logger::log(&format!(
            "{:?} ignored: {:?} still active",
            requested, active
        ));
        self.events.push(ControllerEvent::Diagnostic(ControllerDiagnostic::AbilityBusy {
            requested,
            active,
        }));
        true
    }

    // ========================================================================
    // Fixed tick
    // ========================================================================

    pub fn fixed_advance(&mut self, dt: f32, input: &dyn InputSource) {
        if !self.is_dashing() {
            self.apply_movement(input);
        }
        if !self.is_bashing() {
            self.face_aim_point();
        }
        if self.gravity_enabled {
            let mut velocity = self.body.linear_velocity();
            velocity.y += self.config.movement.gravity * dt;
            self.body.set_linear_velocity(velocity);
        }
    }

    /// Camera-relative planar velocity; vertical component untouched.
    fn apply_movement(&mut self, input: &dyn InputSource) {
        let forward = self.viewpoint.forward();
        let right = self.viewpoint.right();

        let mut direction = Vec3::ZERO;
        if input.held(ControlAction::Forward) {
            direction += forward;
        }
        if input.held(ControlAction::Back) {
            direction -= forward;
        }
        if input.held(ControlAction::Right) {
            direction += right;
        }
        if input.held(ControlAction::Left) {
            direction -= right;
        }
        direction.y = 0.0;
        let direction = direction.normalize_or_zero();

        let speed = self.config.movement.speed;
        let mut velocity = self.body.linear_velocity();
        velocity.x = direction.x * speed;
        velocity.z = direction.z * speed;
        self.body.set_linear_velocity(velocity);
    }

    /// Yaw toward the aim point on the character's horizontal plane (-Z forward).
    fn face_aim_point(&mut self) {
        let offset = self.aim_point - self.body.position();
        let flat = Vec2::new(offset.x, offset.z);
        if flat.length_squared() <= f32::EPSILON {
            return;
        }

        self.base_rotation = Quat::from_rotation_y(f32::atan2(-flat.x, -flat.y));
    }
}
