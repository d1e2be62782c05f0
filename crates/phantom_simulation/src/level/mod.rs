//! Level: patrol point provider
//!
//! Waypoints — обычные entities с [`Waypoint`] + `Transform`. Порядок
//! патруля задаётся именами в `LevelConfig.patrol_points`; позиции читаются
//! в момент запроса (live transforms).

use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::logger;

/// Named patrol waypoint.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Waypoint {
    pub name: String,
}

impl Waypoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered patrol points of the current level.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelManager {
    patrol_points: Vec<Entity>,
}

impl LevelManager {
    pub fn from_entities(patrol_points: Vec<Entity>) -> Self {
        Self { patrol_points }
    }

    /// Current waypoint positions, in patrol order.
    ///
    /// Never fails: empty when nothing is configured, despawned waypoints
    /// are skipped.
    pub fn patrol_positions(&self, world: &World) -> Vec<Vec3> {
        self.patrol_points
            .iter()
            .filter_map(|&entity| world.get::<Transform>(entity))
            .map(|transform| transform.translation)
            .collect()
    }

    /// Same as [`patrol_positions`](Self::patrol_positions), from a system query.
    pub fn patrol_positions_from(&self, transforms: &Query<&Transform>) -> Vec<Vec3> {
        self.patrol_points
            .iter()
            .filter_map(|&entity| transforms.get(entity).ok())
            .map(|transform| transform.translation)
            .collect()
    }
}

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Waypoint>()
            .init_resource::<LevelManager>()
            .add_systems(PostStartup, resolve_patrol_points);
    }
}

/// Resolves configured waypoint names → entities (once, at scene load).
fn resolve_patrol_points(
    config: Option<Res<SimulationConfig>>,
    waypoints: Query<(Entity, &Waypoint)>,
    mut level: ResMut<LevelManager>,
) {
    let Some(config) = config else {
        return;
    };

    let mut patrol_points = Vec::with_capacity(config.level.patrol_points.len());
    for name in &config.level.patrol_points {
        match waypoints.iter().find(|(_, waypoint)| &waypoint.name == name) {
            Some((entity, _)) => patrol_points.push(entity),
            None => logger::log_warning(&format!("Level: unknown patrol waypoint '{}', skipped", name)),
        }
    }

    logger::log_info(&format!("Level: {} patrol points", patrol_points.len()));
    *level = LevelManager::from_entities(patrol_points);
}
