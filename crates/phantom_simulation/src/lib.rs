//! PHANTOM Simulation Core
//!
//! Headless game logic персонажа на Bevy 0.16:
//! - CharacterAbilityController: movement, jump, aim, phantom dash, briefcase bash
//! - LevelManager: patrol points из waypoints сцены
//!
//! Engine services (physics, input, camera, VFX, enemies) — trait boundaries,
//! headless stand-ins живут рядом и используются runner'ом и тестами.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod abilities;
pub mod camera;
pub mod combat;
pub mod config;
pub mod controller;
pub mod effects;
pub mod input;
pub mod level;
pub mod logger;
pub mod physics;

// Re-export основных типов
pub use abilities::{AbilityKind, ActiveAbility, BashState, DashState, SpinCurve};
pub use camera::{FixedViewpoint, Viewpoint};
pub use combat::{AttackReceiver, Enemy, EnemyRegistry, EnemyRoster, HitPolicy};
pub use config::{
    BashConfig, ConfigError, ControllerConfig, DashConfig, LevelConfig, MovementConfig,
    SimulationConfig,
};
pub use controller::{
    spawn_player, CharacterAbilityController, ControllerDiagnostic, ControllerEvent,
    ControllerServices, FrameCounter, PlayerController, PlayerControllerEvent,
    PlayerControllerPlugin,
};
pub use effects::{EffectHandle, EffectKind, EffectLedger, VisualHost};
pub use input::{ControlAction, InputCommand, InputSource, InputTimeline, ScriptedInput};
pub use level::{LevelManager, LevelPlugin, Waypoint};
pub use logger::{init_logger, LogLevel};
pub use physics::{
    layers, CharacterBody, ColliderHit, ColliderId, PhysicsQueries, RayHit, SceneColliders,
    SimBody,
};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Берёт `SimulationConfig` из world, если он уже вставлен, иначе defaults.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        app
            // Fixed timestep для velocity/rotation/gravity
            .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            // Детерминистичный RNG (seed из конфига)
            .insert_resource(DeterministicRng::new(config.seed))
            .insert_resource(config)
            .add_plugins((PlayerControllerPlugin, LevelPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(SimulationConfig {
        seed,
        ..default()
    })
}

/// Headless App с полным конфигом (runner, integration тесты).
pub fn create_headless_app_with_config(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    if let Some(level) = config.log_level() {
        logger::set_log_level(level);
    }

    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    app
}

/// Прогоняет один кадр с заданной длительностью (вместо wall clock).
pub fn step_frame(app: &mut App, delta: Duration) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(delta));
    app.update();
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

/// Snapshot состояния игроков: body, aim, rotation base, активная способность.
pub fn controller_snapshot(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &PlayerController)>();
    let mut players: Vec<_> = query.iter(world).collect();
    players.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, player) in players {
        let controller = &player.0;
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(
            format!(
                "{:?}|{:?}|{:?}|{:?}|{:?}",
                controller.body(),
                controller.aim_point(),
                controller.base_rotation(),
                controller.weapon_height(),
                controller.ability()
            )
            .as_bytes(),
        );
    }

    snapshot
}
