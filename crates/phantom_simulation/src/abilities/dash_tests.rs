use super::*;
use bevy::prelude::*;

#[test]
fn test_duration_is_distance_over_speed() {
    let dash = DashState::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.0);
    assert!((dash.duration - 1.0).abs() < 1e-6);
}

#[test]
fn test_halving_speed_doubles_duration() {
    let fast = DashState::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), 10.0);
    let slow = DashState::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), 5.0);
    assert!((slow.duration - 2.0 * fast.duration).abs() < 1e-6);
}

#[test]
fn test_midpoint_at_half_duration() {
    let mut dash = DashState::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.0);

    let step = dash.advance(0.5);
    assert!(!step.finished);
    assert!(step.position.distance(Vec3::new(5.0, 0.0, 0.0)) < 1e-5);
    assert!((dash.progress() - 0.5).abs() < 1e-6);
}

#[test]
fn test_lands_exactly_on_end_with_uneven_ticks() {
    let end = Vec3::new(7.3, 1.1, -2.9);
    let mut dash = DashState::new(Vec3::new(0.2, 0.0, 0.4), end, 9.0);

    let ticks = [0.013, 0.031, 0.0167, 0.25, 0.09, 0.4, 0.7];
    let mut last = None;
    for dt in ticks {
        let step = dash.advance(dt);
        last = Some(step);
        if step.finished {
            break;
        }
    }

    let last = last.unwrap();
    assert!(last.finished);
    assert_eq!(last.position, end);
}

#[test]
fn test_overshooting_tick_clamps_to_end() {
    let mut dash = DashState::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.0);
    let step = dash.advance(5.0);
    assert!(step.finished);
    assert_eq!(step.position, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(dash.progress(), 1.0);
}

#[test]
fn test_zero_length_dash_finishes_first_tick() {
    let here = Vec3::new(1.0, 2.0, 3.0);
    let mut dash = DashState::new(here, here, 10.0);
    assert_eq!(dash.duration, 0.0);

    let step = dash.advance(0.0);
    assert!(step.finished);
    assert_eq!(step.position, here);
}

#[test]
fn test_ability_slot_helpers() {
    let slot = ActiveAbility::Dash(DashState::new(Vec3::ZERO, Vec3::X, 1.0));
    assert!(slot.is_dashing());
    assert!(!slot.is_bashing());
    assert_eq!(slot.kind(), Some(AbilityKind::Dash));
    assert_eq!(ActiveAbility::None.kind(), None);
}
