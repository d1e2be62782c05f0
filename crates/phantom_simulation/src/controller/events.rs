//! Controller events
//!
//! Контроллер копит события за тик; владелец забирает их через
//! `drain_events()` (plugin пересылает в Bevy `Event`s).

use bevy::prelude::*;

use crate::abilities::AbilityKind;
use crate::physics::ColliderId;

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Jumped {
        impulse: Vec3,
    },
    DashStarted {
        from: Vec3,
        to: Vec3,
        duration: f32,
    },
    DashCompleted {
        position: Vec3,
    },
    BashStarted,
    /// `timer >= delay`: hit volume live, trail activated
    BashHitWindowOpened,
    EnemyStruck {
        collider: ColliderId,
        /// Receiver position − character position
        push: Vec3,
    },
    BashCompleted {
        strikes: u32,
    },
    Diagnostic(ControllerDiagnostic),
}

/// Recoverable per-tick anomalies (never errors; the tick continues).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerDiagnostic {
    /// Overlap found a collider on the enemy layer with no attack receiver
    MissingAttackReceiver { collider: ColliderId },
    /// Ability trigger ignored: another ability is running
    AbilityBusy {
        requested: AbilityKind,
        active: AbilityKind,
    },
}

/// Controller event tagged with the owning entity.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayerControllerEvent {
    pub entity: Entity,
    pub event: ControllerEvent,
}
