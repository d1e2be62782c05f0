//! Collision Layers
//!
//! Централизованные слои для всех physics queries контроллера.
//!
//! ## Layers:
//! - `PLAYER`: capsule игрока (исключается из ground check)
//! - `ENVIRONMENT`: пол, стены, платформы
//! - `CURSOR`: поверхности, по которым ведётся прицел (aim ray)
//! - `ENEMY`: hurtboxes врагов (bash overlap)
//!
//! Один collider может состоять в нескольких слоях (пол обычно
//! `ENVIRONMENT | CURSOR`).

use bevy_rapier3d::prelude::Group;

pub const PLAYER: Group = Group::GROUP_1;
pub const ENVIRONMENT: Group = Group::GROUP_2;
pub const CURSOR: Group = Group::GROUP_3;
pub const ENEMY: Group = Group::GROUP_4;

/// Unfiltered proximity queries (ground check).
pub const ALL: Group = Group::ALL;

/// Floor that also receives the aim ray.
pub fn walkable_surface() -> Group {
    ENVIRONMENT.union(CURSOR)
}

/// Название слоя для debug логов
pub fn layer_name(layer: Group) -> &'static str {
    if layer == PLAYER {
        "Player"
    } else if layer == ENVIRONMENT {
        "Environment"
    } else if layer == CURSOR {
        "Cursor"
    } else if layer == ENEMY {
        "Enemy"
    } else if layer == walkable_surface() {
        "Walkable"
    } else {
        "Mixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_disjoint() {
        let layers = [PLAYER, ENVIRONMENT, CURSOR, ENEMY];
        for (i, a) in layers.iter().enumerate() {
            for b in layers.iter().skip(i + 1) {
                assert!(!a.intersects(*b));
            }
        }
    }

    #[test]
    fn test_walkable_surface_receives_aim_ray() {
        assert!(walkable_surface().contains(CURSOR));
        assert!(walkable_surface().contains(ENVIRONMENT));
        assert!(!walkable_surface().intersects(PLAYER));
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(layer_name(CURSOR), "Cursor");
        assert_eq!(layer_name(walkable_surface()), "Walkable");
    }
}
