//! Visual effect host
//!
//! Контроллер только спавнит/отцепляет/включает эффекты на rotation base.
//! Fade и destroy — ответственность effect system, не контроллера.

use std::collections::VecDeque;

use bevy::prelude::*;

/// Сколько последних эффектов держит headless ledger.
const LEDGER_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Particle trail left by the phantom dash
    DashTrail,
    /// Melee trail following the briefcase
    BashTrail,
}

pub trait VisualHost: Send + Sync {
    /// Spawns an effect parented to the character's rotation base.
    fn spawn_effect(&mut self, kind: EffectKind, local: Transform, active: bool) -> EffectHandle;

    /// Unparents the effect; it keeps playing in world space and fades by itself.
    fn detach_effect(&mut self, handle: EffectHandle);

    fn set_effect_active(&mut self, handle: EffectHandle, active: bool);

    fn set_effect_local_position(&mut self, handle: EffectHandle, position: Vec3);

    /// Stops emitting new particles; existing ones fade on their own schedule.
    fn stop_emitting(&mut self, handle: EffectHandle);

    fn set_model_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectRecord {
    pub handle: EffectHandle,
    pub kind: EffectKind,
    pub local: Transform,
    pub active: bool,
    pub attached: bool,
    pub emitting: bool,
}

/// Headless [`VisualHost`]: records effect state for assertions.
///
/// Keeps the most recent effects only; older records are dropped, spawn
/// counts per kind stay exact.
#[derive(Resource, Debug, Clone)]
pub struct EffectLedger {
    effects: VecDeque<EffectRecord>,
    next_handle: u64,
    dash_trails: usize,
    bash_trails: usize,
    model_visible: bool,
}

impl Default for EffectLedger {
    fn default() -> Self {
        Self {
            effects: VecDeque::with_capacity(LEDGER_CAPACITY),
            next_handle: 0,
            dash_trails: 0,
            bash_trails: 0,
            model_visible: true,
        }
    }
}

impl EffectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&EffectRecord> {
        self.effects.iter().find(|record| record.handle == handle)
    }

    /// Total effects of `kind` spawned since start.
    pub fn count(&self, kind: EffectKind) -> usize {
        match kind {
            EffectKind::DashTrail => self.dash_trails,
            EffectKind::BashTrail => self.bash_trails,
        }
    }

    pub fn latest(&self, kind: EffectKind) -> Option<&EffectRecord> {
        self.effects.iter().rev().find(|record| record.kind == kind)
    }

    pub fn model_visible(&self) -> bool {
        self.model_visible
    }

    fn record_mut(&mut self, handle: EffectHandle) -> Option<&mut EffectRecord> {
        let record = self.effects.iter_mut().find(|record| record.handle == handle);
        if record.is_none() {
            crate::logger::log_warning(&format!("EffectLedger: unknown effect handle {:?}", handle));
        }
        record
    }
}

impl VisualHost for EffectLedger {
    fn spawn_effect(&mut self, kind: EffectKind, local: Transform, active: bool) -> EffectHandle {
        let handle = EffectHandle(self.next_handle);
        self.next_handle += 1;
        match kind {
            EffectKind::DashTrail => self.dash_trails += 1,
            EffectKind::BashTrail => self.bash_trails += 1,
        }

        if self.effects.len() == LEDGER_CAPACITY {
            self.effects.pop_front();
        }
        self.effects.push_back(EffectRecord {
            handle,
            kind,
            local,
            active,
            attached: true,
            emitting: true,
        });
        handle
    }

    fn detach_effect(&mut self, handle: EffectHandle) {
        if let Some(record) = self.record_mut(handle) {
            record.attached = false;
        }
    }

    fn set_effect_active(&mut self, handle: EffectHandle, active: bool) {
        if let Some(record) = self.record_mut(handle) {
            record.active = active;
        }
    }

    fn set_effect_local_position(&mut self, handle: EffectHandle, position: Vec3) {
        if let Some(record) = self.record_mut(handle) {
            record.local.translation = position;
        }
    }

    fn stop_emitting(&mut self, handle: EffectHandle) {
        if let Some(record) = self.record_mut(handle) {
            record.emitting = false;
        }
    }

    fn set_model_visible(&mut self, visible: bool) {
        self.model_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_tracks_effect_lifecycle() {
        let mut ledger = EffectLedger::new();
        let trail = ledger.spawn_effect(EffectKind::BashTrail, Transform::default(), false);

        ledger.set_effect_local_position(trail, Vec3::new(0.0, 1.5, -2.0));
        ledger.set_effect_active(trail, true);
        ledger.stop_emitting(trail);

        let record = ledger.get(trail).unwrap();
        assert!(record.active);
        assert!(record.attached);
        assert!(!record.emitting);
        assert_eq!(record.local.translation, Vec3::new(0.0, 1.5, -2.0));

        ledger.detach_effect(trail);
        assert!(!ledger.get(trail).unwrap().attached);
    }

    #[test]
    fn test_handles_are_unique_per_spawn() {
        let mut ledger = EffectLedger::new();
        let a = ledger.spawn_effect(EffectKind::DashTrail, Transform::default(), true);
        let b = ledger.spawn_effect(EffectKind::DashTrail, Transform::default(), true);
        assert_ne!(a, b);
        assert_eq!(ledger.count(EffectKind::DashTrail), 2);
        assert_eq!(ledger.latest(EffectKind::DashTrail).unwrap().handle, b);
    }

    #[test]
    fn test_long_run_keeps_ledger_bounded() {
        let mut ledger = EffectLedger::new();
        let first = ledger.spawn_effect(EffectKind::DashTrail, Transform::default(), true);
        for _ in 0..500 {
            let trail = ledger.spawn_effect(EffectKind::BashTrail, Transform::default(), false);
            ledger.stop_emitting(trail);
        }
        let last = ledger.spawn_effect(EffectKind::DashTrail, Transform::default(), true);

        assert_eq!(ledger.effects.len(), LEDGER_CAPACITY);
        assert!(ledger.get(first).is_none());
        assert_eq!(ledger.get(last).unwrap().kind, EffectKind::DashTrail);
        assert_eq!(ledger.count(EffectKind::BashTrail), 500);
        assert_eq!(ledger.count(EffectKind::DashTrail), 2);
    }
}
