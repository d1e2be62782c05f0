//! Headless симуляция PHANTOM
//!
//! Демо-сцена: пол, враги, waypoints, скриптованный ввод (ходьба → dash →
//! bash). Кадры с jitter из DeterministicRng — прогон воспроизводим по seed.
//!
//! Usage: `phantom_simulation [config.toml]`

use std::process::ExitCode;
use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use phantom_simulation::logger::{self, FileLogger};
use phantom_simulation::{
    create_headless_app_with_config, layers, spawn_player, step_frame, ControlAction,
    ControllerEvent, DeterministicRng, EffectKind, EffectLedger, EnemyRoster, FixedViewpoint,
    InputCommand, InputTimeline, LevelManager, PlayerControllerEvent, SceneColliders, SimBody,
    SimulationConfig, Waypoint,
};

const FRAME_COUNT: u64 = 600;

fn main() -> ExitCode {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => demo_config(),
    };

    if let Some(path) = &config.log_file {
        let file_logger = FileLogger::new(path);
        file_logger.clear();
        logger::set_logger(Box::new(file_logger));
    }

    logger::log_info(&format!(
        "Starting PHANTOM headless simulation (seed: {}, fixed: {} Hz)",
        config.seed, config.fixed_hz
    ));

    let mut app = create_headless_app_with_config(config);
    build_demo_scene(app.world_mut());
    app.insert_resource(demo_timeline())
        .add_systems(Update, log_controller_events);

    for frame in 0..FRAME_COUNT {
        // 60 fps ± jitter
        let delta = {
            let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
            1.0 / 60.0 + rng.rng.gen_range(-0.004..0.004)
        };
        step_frame(&mut app, Duration::from_secs_f64(delta));

        if frame % 100 == 0 {
            log_progress(app.world_mut(), frame);
        }
    }

    let world = app.world();
    let ledger = world.resource::<EffectLedger>();
    logger::log_info(&format!(
        "Simulation complete: {} enemy hits, {} dash trails, {} bash trails",
        world.resource::<EnemyRoster>().total_hits(),
        ledger.count(EffectKind::DashTrail),
        ledger.count(EffectKind::BashTrail)
    ));

    ExitCode::SUCCESS
}

fn demo_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.level.patrol_points = ["gate", "yard", "dock"].map(String::from).to_vec();
    config
}

fn build_demo_scene(world: &mut World) {
    {
        let mut scene = world.resource_mut::<SceneColliders>();
        scene.add_ground(0.0, layers::walkable_surface());
        scene.add_cuboid(Vec3::new(0.0, 1.0, -15.0), Vec3::new(10.0, 1.0, 0.5), layers::ENVIRONMENT);
    }

    world.resource_scope(|world, mut roster: Mut<EnemyRoster>| {
        let mut scene = world.resource_mut::<SceneColliders>();
        for position in [
            Vec3::new(1.5, 1.0, -1.0),
            Vec3::new(-6.0, 1.0, 2.0),
            Vec3::new(4.0, 1.0, 5.0),
        ] {
            roster.spawn(&mut scene, position, 0.5);
        }
    });

    for (name, position) in [
        ("gate", Vec3::new(-8.0, 0.0, -8.0)),
        ("yard", Vec3::new(8.0, 0.0, -8.0)),
        ("dock", Vec3::new(0.0, 0.0, 8.0)),
    ] {
        world.spawn((Waypoint::new(name), Transform::from_translation(position)));
    }

    spawn_player(
        world,
        SimBody::new(Vec3::new(0.0, 1.0, 0.0)).with_floor(1.0),
        FixedViewpoint::default(),
    );
}

/// Walk forward, dash toward the lower-right of the screen, bash among enemies.
fn demo_timeline() -> InputTimeline {
    InputTimeline::default()
        .at(0, InputCommand::Pointer(Vec2::new(640.0, 300.0)))
        .at(10, InputCommand::Press(ControlAction::Forward))
        .at(70, InputCommand::Release(ControlAction::Forward))
        .at(80, InputCommand::Tap(ControlAction::Jump))
        .at(150, InputCommand::Pointer(Vec2::new(900.0, 500.0)))
        .at(160, InputCommand::Tap(ControlAction::Dash))
        .at(260, InputCommand::Pointer(Vec2::new(560.0, 380.0)))
        .at(270, InputCommand::Tap(ControlAction::Bash))
        .at(300, InputCommand::Tap(ControlAction::Dash))
        .at(400, InputCommand::Press(ControlAction::Left))
        .at(460, InputCommand::Release(ControlAction::Left))
        .at(480, InputCommand::Tap(ControlAction::Bash))
}

fn log_controller_events(mut events: EventReader<PlayerControllerEvent>) {
    for PlayerControllerEvent { entity, event } in events.read() {
        match event {
            ControllerEvent::Diagnostic(diagnostic) => {
                logger::log_warning(&format!("{:?}: {:?}", entity, diagnostic));
            }
            ControllerEvent::EnemyStruck { .. } => logger::log(&format!("{:?}: {:?}", entity, event)),
            _ => logger::log_info(&format!("{:?}: {:?}", entity, event)),
        }
    }
}

fn log_progress(world: &mut World, frame: u64) {
    let patrol = world.resource::<LevelManager>().patrol_positions(world);

    let mut players = world.query::<(Entity, &Transform, &phantom_simulation::PlayerController)>();
    for (entity, transform, player) in players.iter(world) {
        logger::log_info(&format!(
            "Frame {}: {:?} at {:?}, ability {:?}, patrol route {} points",
            frame,
            entity,
            transform.translation,
            player.0.ability().kind(),
            patrol.len()
        ));
    }
}
