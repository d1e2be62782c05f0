//! Physics query service
//!
//! Контроллер не владеет физикой: ray cast для прицела, sphere overlap для
//! ground check и box overlap для bash идут через [`PhysicsQueries`].
//! [`SceneColliders`] — headless реализация (простые формы, без solver'а).

use bevy::math::{Dir3, Ray3d, Vec3};
use bevy::prelude::Resource;
use bevy_rapier3d::prelude::Group;

/// Stable id of a collider inside the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// Closest hit of a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderId,
    pub point: Vec3,
    pub distance: f32,
}

/// Collider found by an overlap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderHit {
    pub collider: ColliderId,
    /// Layers the collider is a member of
    pub layer: Group,
    /// World position of the collider origin
    pub position: Vec3,
}

pub trait PhysicsQueries: Send + Sync {
    /// Closest hit within `max_distance` against colliders on `layers`.
    fn raycast(&self, ray: Ray3d, max_distance: f32, layers: Group) -> Option<RayHit>;

    fn overlap_sphere(&self, center: Vec3, radius: f32, layers: Group) -> Vec<ColliderHit>;

    /// Axis-aligned box overlap.
    fn overlap_box(&self, center: Vec3, half_extents: Vec3, layers: Group) -> Vec<ColliderHit>;
}

// ============================================================================
// Headless colliders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColliderShape {
    Sphere { radius: f32 },
    /// Axis-aligned box
    Cuboid { half_extents: Vec3 },
    /// Infinite plane through the collider position
    Plane { normal: Dir3 },
}

#[derive(Debug, Clone, PartialEq)]
struct SceneCollider {
    id: ColliderId,
    shape: ColliderShape,
    position: Vec3,
    layer: Group,
}

/// Static list of simple colliders answering [`PhysicsQueries`].
///
/// Результаты overlap'ов возвращаются в порядке добавления (детерминизм).
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneColliders {
    colliders: Vec<SceneCollider>,
    next_id: u32,
}

impl SceneColliders {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, shape: ColliderShape, position: Vec3, layer: Group) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.push(SceneCollider {
            id,
            shape,
            position,
            layer,
        });
        id
    }

    /// Horizontal plane at `height` (normal +Y).
    pub fn add_ground(&mut self, height: f32, layer: Group) -> ColliderId {
        self.add(
            ColliderShape::Plane { normal: Dir3::Y },
            Vec3::new(0.0, height, 0.0),
            layer,
        )
    }

    pub fn add_sphere(&mut self, position: Vec3, radius: f32, layer: Group) -> ColliderId {
        self.add(ColliderShape::Sphere { radius }, position, layer)
    }

    pub fn add_cuboid(&mut self, position: Vec3, half_extents: Vec3, layer: Group) -> ColliderId {
        self.add(ColliderShape::Cuboid { half_extents }, position, layer)
    }

    /// Moves a collider; returns `false` for unknown ids.
    pub fn set_position(&mut self, id: ColliderId, position: Vec3) -> bool {
        match self.colliders.iter_mut().find(|c| c.id == id) {
            Some(collider) => {
                collider.position = position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.id != id);
        self.colliders.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn on_layers(&self, layers: Group) -> impl Iterator<Item = &SceneCollider> {
        self.colliders.iter().filter(move |c| c.layer.intersects(layers))
    }

    fn hit(collider: &SceneCollider) -> ColliderHit {
        ColliderHit {
            collider: collider.id,
            layer: collider.layer,
            position: collider.position,
        }
    }
}

impl PhysicsQueries for SceneColliders {
    fn raycast(&self, ray: Ray3d, max_distance: f32, layers: Group) -> Option<RayHit> {
        let origin = ray.origin;
        let direction = *ray.direction;

        self.on_layers(layers)
            .filter_map(|collider| {
                let distance = match collider.shape {
                    ColliderShape::Sphere { radius } => {
                        ray_sphere(origin, direction, collider.position, radius)
                    }
                    ColliderShape::Cuboid { half_extents } => {
                        ray_aabb(origin, direction, collider.position, half_extents)
                    }
                    ColliderShape::Plane { normal } => {
                        ray_plane(origin, direction, collider.position, *normal)
                    }
                }?;
                (distance <= max_distance).then_some(RayHit {
                    collider: collider.id,
                    point: origin + direction * distance,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, layers: Group) -> Vec<ColliderHit> {
        self.on_layers(layers)
            .filter(|collider| match collider.shape {
                ColliderShape::Sphere { radius: other } => {
                    center.distance_squared(collider.position) <= (radius + other).powi(2)
                }
                ColliderShape::Cuboid { half_extents } => {
                    let closest = center.clamp(
                        collider.position - half_extents,
                        collider.position + half_extents,
                    );
                    center.distance_squared(closest) <= radius * radius
                }
                ColliderShape::Plane { normal } => {
                    (center - collider.position).dot(*normal).abs() <= radius
                }
            })
            .map(Self::hit)
            .collect()
    }

    fn overlap_box(&self, center: Vec3, half_extents: Vec3, layers: Group) -> Vec<ColliderHit> {
        let min = center - half_extents;
        let max = center + half_extents;

        self.on_layers(layers)
            .filter(|collider| match collider.shape {
                ColliderShape::Sphere { radius } => {
                    let closest = collider.position.clamp(min, max);
                    collider.position.distance_squared(closest) <= radius * radius
                }
                ColliderShape::Cuboid { half_extents: other } => {
                    let delta = (collider.position - center).abs();
                    delta.cmple(half_extents + other).all()
                }
                ColliderShape::Plane { normal } => {
                    let projected = half_extents.dot(normal.abs());
                    (center - collider.position).dot(*normal).abs() <= projected
                }
            })
            .map(Self::hit)
            .collect()
    }
}

// ============================================================================
// Ray helpers (distance along a unit direction)
// ============================================================================

fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    // Origin inside the sphere counts as a hit at distance 0
    Some((-b - discriminant.sqrt()).max(0.0))
}

fn ray_aabb(origin: Vec3, direction: Vec3, center: Vec3, half_extents: Vec3) -> Option<f32> {
    let min = center - half_extents;
    let max = center + half_extents;
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

fn ray_plane(origin: Vec3, direction: Vec3, point: Vec3, normal: Vec3) -> Option<f32> {
    let denominator = normal.dot(direction);
    if denominator.abs() < f32::EPSILON {
        return None;
    }
    let distance = (point - origin).dot(normal) / denominator;
    (distance >= 0.0).then_some(distance)
}
