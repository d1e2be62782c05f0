//! Active viewpoint
//!
//! Camera-relative steering и screen → world ray для прицела.
//! Конвенция Bevy: камера смотрит вдоль -Z, up = +Y.

use bevy::math::{Dir3, Ray3d, Vec2, Vec3};
use bevy::prelude::Transform;

pub trait Viewpoint: Send + Sync {
    /// World-space forward of the camera.
    fn forward(&self) -> Vec3;

    /// World-space right of the camera.
    fn right(&self) -> Vec3;

    /// Ray through a viewport pixel; `None` for a degenerate viewport.
    fn screen_point_to_ray(&self, pointer: Vec2) -> Option<Ray3d>;
}

/// Perspective pinhole camera with a fixed transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewpoint {
    pub transform: Transform,
    /// Vertical field of view (radians)
    pub vertical_fov: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl Default for FixedViewpoint {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 12.0, 12.0), Vec3::ZERO, Vec2::new(1280.0, 720.0))
    }
}

impl FixedViewpoint {
    pub fn looking_at(eye: Vec3, target: Vec3, viewport: Vec2) -> Self {
        Self {
            transform: Transform::from_translation(eye).looking_at(target, Vec3::Y),
            vertical_fov: std::f32::consts::FRAC_PI_4,
            viewport,
        }
    }

    pub fn viewport_center(&self) -> Vec2 {
        self.viewport * 0.5
    }
}

impl Viewpoint for FixedViewpoint {
    fn forward(&self) -> Vec3 {
        *self.transform.forward()
    }

    fn right(&self) -> Vec3 {
        *self.transform.right()
    }

    fn screen_point_to_ray(&self, pointer: Vec2) -> Option<Ray3d> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }

        // pixels → NDC (y вверх)
        let ndc = Vec2::new(
            2.0 * pointer.x / self.viewport.x - 1.0,
            1.0 - 2.0 * pointer.y / self.viewport.y,
        );
        let half_height = (self.vertical_fov * 0.5).tan();
        let aspect = self.viewport.x / self.viewport.y;
        let local = Vec3::new(ndc.x * half_height * aspect, ndc.y * half_height, -1.0);

        let direction = Dir3::new(self.transform.rotation * local).ok()?;
        Some(Ray3d::new(self.transform.translation, direction))
    }
}
