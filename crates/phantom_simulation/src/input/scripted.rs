//! Scripted input (headless runs, tests)
//!
//! Mock input вместо клавиатуры: команды применяются по номеру кадра,
//! edge-состояние сбрасывается в `end_frame`.

use std::collections::BTreeSet;

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use super::{ControlAction, InputSource};

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ScriptedInput {
    held: BTreeSet<ControlAction>,
    pressed: BTreeSet<ControlAction>,
    /// Taps release themselves at the end of the frame
    release_at_end: BTreeSet<ControlAction>,
    pointer: Vec2,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key goes down and stays held until [`release`](Self::release).
    pub fn press(&mut self, action: ControlAction) {
        if self.held.insert(action) {
            self.pressed.insert(action);
        }
        self.release_at_end.remove(&action);
    }

    /// Press for exactly one frame.
    pub fn tap(&mut self, action: ControlAction) {
        self.pressed.insert(action);
        self.held.insert(action);
        self.release_at_end.insert(action);
    }

    pub fn release(&mut self, action: ControlAction) {
        self.held.remove(&action);
        self.pressed.remove(&action);
        self.release_at_end.remove(&action);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.release_at_end.clear();
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Clears edge state. Call once per variable tick after the controller ran.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        for action in std::mem::take(&mut self.release_at_end) {
            self.held.remove(&action);
        }
    }

    pub fn apply(&mut self, command: &InputCommand) {
        match *command {
            InputCommand::Press(action) => self.press(action),
            InputCommand::Tap(action) => self.tap(action),
            InputCommand::Release(action) => self.release(action),
            InputCommand::Pointer(pointer) => self.set_pointer(pointer),
        }
    }
}

impl InputSource for ScriptedInput {
    fn held(&self, action: ControlAction) -> bool {
        self.held.contains(&action)
    }

    fn just_pressed(&self, action: ControlAction) -> bool {
        self.pressed.contains(&action)
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputCommand {
    Press(ControlAction),
    Tap(ControlAction),
    Release(ControlAction),
    Pointer(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub frame: u64,
    pub command: InputCommand,
}

/// Frame-indexed input script.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTimeline {
    entries: Vec<TimelineEntry>,
}

impl InputTimeline {
    pub fn new(mut entries: Vec<TimelineEntry>) -> Self {
        // stable sort: команды одного кадра сохраняют порядок
        entries.sort_by_key(|entry| entry.frame);
        Self { entries }
    }

    pub fn at(mut self, frame: u64, command: InputCommand) -> Self {
        self.entries.push(TimelineEntry { frame, command });
        self.entries.sort_by_key(|entry| entry.frame);
        self
    }

    /// Applies every command scheduled for `frame`; returns how many ran.
    pub fn apply(&self, frame: u64, input: &mut ScriptedInput) -> usize {
        let mut applied = 0;
        for entry in self.entries.iter().filter(|entry| entry.frame == frame) {
            input.apply(&entry.command);
            applied += 1;
        }
        applied
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.frame)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
