//! Integration тесты: контроллер внутри headless Bevy App
//!
//! Проверяем связку plugin'а: input timeline → advance → events,
//! FixedUpdate → velocity/gravity → SimBody → Transform.

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use phantom_simulation::{
    create_headless_app, create_headless_app_with_config, layers, spawn_player, step_frame,
    ControlAction, ControllerEvent, EffectKind, EffectLedger, EnemyRoster, FixedViewpoint,
    InputCommand, InputTimeline, LevelManager, PlayerController, PlayerControllerEvent,
    SceneColliders, SimBody, SimulationConfig, Waypoint,
};

const FRAME: Duration = Duration::from_micros(16_667);

/// Копит все controller events (Bevy events живут 2 кадра).
#[derive(Resource, Default)]
struct CollectedEvents(Vec<ControllerEvent>);

fn collect_events(mut reader: EventReader<PlayerControllerEvent>, mut collected: ResMut<CollectedEvents>) {
    collected.0.extend(reader.read().map(|e| e.event.clone()));
}

fn setup_app(config: SimulationConfig, timeline: InputTimeline) -> (App, Entity) {
    let mut app = create_headless_app_with_config(config);
    app.init_resource::<CollectedEvents>()
        .insert_resource(timeline)
        .add_systems(PostUpdate, collect_events);

    app.world_mut()
        .resource_mut::<SceneColliders>()
        .add_ground(0.0, layers::walkable_surface());

    let player = spawn_player(
        app.world_mut(),
        SimBody::new(Vec3::new(0.0, 1.0, 0.0)).with_floor(1.0),
        FixedViewpoint::default(),
    );
    (app, player)
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        step_frame(app, FRAME);
    }
}

fn player_position(app: &App, player: Entity) -> Vec3 {
    app.world().get::<Transform>(player).unwrap().translation
}

fn controller<'a>(app: &'a App, player: Entity) -> &'a PlayerController {
    app.world().get::<PlayerController>(player).unwrap()
}

#[test]
fn test_forward_input_moves_player_away_from_camera() {
    let timeline = InputTimeline::default().at(1, InputCommand::Press(ControlAction::Forward));
    let (mut app, player) = setup_app(SimulationConfig::default(), timeline);

    run_frames(&mut app, 60);

    let position = player_position(&app, player);
    assert!(position.z < -5.0, "player should walk toward -Z, got {:?}", position);
    assert!(position.x.abs() < 1e-3);
    // гравитация прижимает к полу
    assert!((position.y - 1.0).abs() < 1e-4);
}

#[test]
fn test_dash_to_cursor_through_app() {
    let center = FixedViewpoint::default().viewport_center();
    let timeline = InputTimeline::default()
        .at(0, InputCommand::Pointer(center + Vec2::new(200.0, 0.0)))
        .at(2, InputCommand::Tap(ControlAction::Dash));
    let (mut app, player) = setup_app(SimulationConfig::default(), timeline);

    run_frames(&mut app, 4);
    assert!(controller(&app, player).0.is_dashing());
    assert!(!app.world().resource::<EffectLedger>().model_visible());

    run_frames(&mut app, 120);
    let events = &app.world().resource::<CollectedEvents>().0;
    let started = events.iter().find_map(|event| match event {
        ControllerEvent::DashStarted { to, .. } => Some(*to),
        _ => None,
    });
    let completed = events.iter().find_map(|event| match event {
        ControllerEvent::DashCompleted { position } => Some(*position),
        _ => None,
    });

    let target = started.expect("dash started");
    assert_eq!(completed, Some(target));
    assert!(target.x > 0.5, "pointer right of center aims right, got {:?}", target);

    let state = &controller(&app, player).0;
    assert!(!state.is_dashing());
    assert!(state.body().collision_enabled);
    assert!(app.world().resource::<EffectLedger>().model_visible());
    // после dash тело снова на полу
    assert!((player_position(&app, player).y - 1.0).abs() < 1e-3);
}

#[test]
fn test_bash_strikes_nearby_enemy() {
    let (mut app, _player) = setup_app(
        SimulationConfig::default(),
        InputTimeline::default().at(2, InputCommand::Tap(ControlAction::Bash)),
    );

    let enemy = app
        .world_mut()
        .resource_scope(|world, mut roster: Mut<EnemyRoster>| {
            let mut scene = world.resource_mut::<SceneColliders>();
            roster.spawn(&mut scene, Vec3::new(0.0, 1.5, 0.0), 2.0)
        });

    run_frames(&mut app, 90);

    let roster = app.world().resource::<EnemyRoster>();
    assert!(roster.get(enemy).unwrap().hit_count() > 10);

    let events = &app.world().resource::<CollectedEvents>().0;
    assert!(events.contains(&ControllerEvent::BashHitWindowOpened));
    assert!(events
        .iter()
        .any(|event| matches!(event, ControllerEvent::BashCompleted { strikes } if *strikes > 10)));

    let trail = app
        .world()
        .resource::<EffectLedger>()
        .latest(EffectKind::BashTrail)
        .cloned()
        .unwrap();
    assert!(trail.active);
    assert!(!trail.emitting);
}

#[test]
fn test_jump_leaves_and_returns_to_floor() {
    let timeline = InputTimeline::default().at(3, InputCommand::Tap(ControlAction::Jump));
    let (mut app, player) = setup_app(SimulationConfig::default(), timeline);

    run_frames(&mut app, 10);
    assert!(player_position(&app, player).y > 1.0);

    run_frames(&mut app, 120);
    assert!((player_position(&app, player).y - 1.0).abs() < 1e-4);
}

#[test]
fn test_patrol_points_resolved_from_config() {
    let mut config = SimulationConfig::default();
    config.level.patrol_points = vec!["b".into(), "a".into(), "missing".into()];
    let mut app = create_headless_app_with_config(config);

    app.world_mut()
        .spawn((Waypoint::new("a"), Transform::from_xyz(1.0, 0.0, 0.0)));
    let b = app
        .world_mut()
        .spawn((Waypoint::new("b"), Transform::from_xyz(0.0, 0.0, 2.0)))
        .id();
    step_frame(&mut app, FRAME);

    let world = app.world();
    let level = world.resource::<LevelManager>();
    assert_eq!(
        level.patrol_positions(world),
        vec![Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 0.0)]
    );

    app.world_mut().entity_mut(b).insert(Transform::from_xyz(9.0, 0.0, 9.0));
    let positions = app
        .world_mut()
        .run_system_once(|level: Res<LevelManager>, transforms: Query<&Transform>| {
            level.patrol_positions_from(&transforms)
        })
        .unwrap();
    assert_eq!(positions[0], Vec3::new(9.0, 0.0, 9.0));
}

#[test]
fn test_headless_app_without_level_config_has_no_patrol() {
    let mut app = create_headless_app(7);
    step_frame(&mut app, FRAME);

    let world = app.world();
    assert!(world.resource::<LevelManager>().patrol_positions(world).is_empty());
}
