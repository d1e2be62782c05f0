//! Bevy driver for the ability controller (headless).
//!
//! Update: input timeline → `advance` → events → end input frame.
//! FixedUpdate: `fixed_advance` → integrate `SimBody` → sync `Transform`.

use bevy::prelude::*;

use super::{CharacterAbilityController, ControllerServices, PlayerControllerEvent};
use crate::camera::Viewpoint;
use crate::combat::EnemyRoster;
use crate::config::{ControllerConfig, SimulationConfig};
use crate::effects::EffectLedger;
use crate::input::{InputTimeline, ScriptedInput};
use crate::physics::{CharacterBody, SceneColliders, SimBody};

/// Player character driven by the headless services.
#[derive(Component)]
pub struct PlayerController(pub CharacterAbilityController<SimBody>);

/// Variable frames since startup (indexes [`InputTimeline`]).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounter(pub u64);

pub struct PlayerControllerPlugin;

impl Plugin for PlayerControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneColliders>()
            .init_resource::<ScriptedInput>()
            .init_resource::<EffectLedger>()
            .init_resource::<EnemyRoster>()
            .init_resource::<FrameCounter>()
            .add_event::<PlayerControllerEvent>()
            .add_systems(
                Update,
                (
                    apply_input_timeline,
                    advance_player_controllers,
                    sync_player_transforms,
                    finish_input_frame,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    fixed_advance_player_controllers,
                    integrate_player_bodies,
                    sync_player_transforms,
                )
                    .chain(),
            );
    }
}

/// Spawns a player entity with the controller config from [`SimulationConfig`]
/// (defaults when the resource is absent).
pub fn spawn_player(world: &mut World, body: SimBody, viewpoint: impl Viewpoint + 'static) -> Entity {
    let config = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.controller.clone())
        .unwrap_or_else(ControllerConfig::default);

    let transform = Transform::from_translation(body.position());
    let controller = CharacterAbilityController::new(body, Box::new(viewpoint), config);

    let entity = world.spawn((PlayerController(controller), transform)).id();
    crate::logger::log(&format!("Player spawned: {:?} at {:?}", entity, transform.translation));
    entity
}

// ============================================================================
// Update
// ============================================================================

fn apply_input_timeline(
    frame: Res<FrameCounter>,
    timeline: Option<Res<InputTimeline>>,
    mut input: ResMut<ScriptedInput>,
) {
    if let Some(timeline) = timeline {
        timeline.apply(frame.0, &mut input);
    }
}

fn advance_player_controllers(
    time: Res<Time>,
    scene: Res<SceneColliders>,
    input: Res<ScriptedInput>,
    mut visuals: ResMut<EffectLedger>,
    mut enemies: ResMut<EnemyRoster>,
    mut players: Query<(Entity, &mut PlayerController)>,
    mut events: EventWriter<PlayerControllerEvent>,
) {
    let dt = time.delta_secs();
    let mut services = ControllerServices {
        physics: &*scene,
        input: &*input,
        visuals: &mut *visuals,
        enemies: &mut *enemies,
    };

    for (entity, mut player) in &mut players {
        player.0.advance(dt, &mut services);
        for event in player.0.drain_events() {
            events.write(PlayerControllerEvent { entity, event });
        }
    }
}

fn finish_input_frame(mut frame: ResMut<FrameCounter>, mut input: ResMut<ScriptedInput>) {
    input.end_frame();
    frame.0 += 1;
}

// ============================================================================
// FixedUpdate
// ============================================================================

fn fixed_advance_player_controllers(
    time: Res<Time>,
    input: Res<ScriptedInput>,
    mut players: Query<&mut PlayerController>,
) {
    let dt = time.delta_secs();
    for mut player in &mut players {
        player.0.fixed_advance(dt, &*input);
    }
}

fn integrate_player_bodies(time: Res<Time>, mut players: Query<&mut PlayerController>) {
    let dt = time.delta_secs();
    for mut player in &mut players {
        player.0.body_mut().step(dt);
    }
}

fn sync_player_transforms(mut players: Query<(&PlayerController, &mut Transform)>) {
    for (player, mut transform) in &mut players {
        transform.translation = player.0.body().position();
        transform.rotation = player.0.base_rotation();
    }
}
