//! Attack receivers
//!
//! Overlap query возвращает colliders; registry превращает collider в
//! получателя удара. Отсутствие получателя — не panic, а `None`.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::{layers, ColliderId, SceneColliders};

/// Something that reacts to being struck.
pub trait AttackReceiver {
    fn position(&self) -> Vec3;

    /// Directional impact: `push` = receiver position − attacker position.
    fn on_attacked(&mut self, push: Vec3);
}

pub trait EnemyRegistry: Send + Sync {
    /// Capability lookup for a collider found by an overlap query.
    fn receiver(&mut self, collider: ColliderId) -> Option<&mut dyn AttackReceiver>;
}

/// How often one enemy can be struck during a single bash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// Every tick the enemy overlaps the hit volume
    #[default]
    EveryTick,
    /// At most once per bash activation
    OncePerActivation,
}

/// Headless enemy: position + received pushes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enemy {
    pub position: Vec3,
    pub hits: Vec<Vec3>,
}

impl Enemy {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            hits: Vec::new(),
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }
}

impl AttackReceiver for Enemy {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn on_attacked(&mut self, push: Vec3) {
        self.hits.push(push);
    }
}

/// Headless [`EnemyRegistry`] keyed by hurtbox collider.
#[derive(Resource, Debug, Clone, Default)]
pub struct EnemyRoster {
    enemies: BTreeMap<ColliderId, Enemy>,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sphere hurtbox on the `ENEMY` layer and registers its receiver.
    pub fn spawn(&mut self, scene: &mut SceneColliders, position: Vec3, radius: f32) -> ColliderId {
        let collider = scene.add_sphere(position, radius, layers::ENEMY);
        self.enemies.insert(collider, Enemy::new(position));
        collider
    }

    /// Moves hurtbox and receiver together, so pushes use the live position.
    pub fn move_enemy(&mut self, scene: &mut SceneColliders, collider: ColliderId, position: Vec3) -> bool {
        let Some(enemy) = self.enemies.get_mut(&collider) else {
            return false;
        };
        enemy.position = position;
        scene.set_position(collider, position)
    }

    pub fn get(&self, collider: ColliderId) -> Option<&Enemy> {
        self.enemies.get(&collider)
    }

    pub fn total_hits(&self) -> usize {
        self.enemies.values().map(Enemy::hit_count).sum()
    }
}

impl EnemyRegistry for EnemyRoster {
    fn receiver(&mut self, collider: ColliderId) -> Option<&mut dyn AttackReceiver> {
        self.enemies
            .get_mut(&collider)
            .map(|enemy| enemy as &mut dyn AttackReceiver)
    }
}
