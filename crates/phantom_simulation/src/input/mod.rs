//! Input service boundary
//!
//! Контроллер опрашивает логические действия, не клавиши:
//! - held: WASD-стиль направления (читаются в fixed tick)
//! - just_pressed: edge-triggered jump/dash/bash (читаются в variable tick)
//! - pointer: позиция курсора в пикселях viewport'а

pub mod scripted;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

pub use scripted::{InputCommand, InputTimeline, ScriptedInput, TimelineEntry};

/// Logical actions the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Dash,
    Bash,
}

pub trait InputSource: Send + Sync {
    /// Action is held this frame.
    fn held(&self, action: ControlAction) -> bool;

    /// Action went down this frame.
    fn just_pressed(&self, action: ControlAction) -> bool;

    /// Pointer position in viewport pixels (origin top-left).
    fn pointer(&self) -> Vec2;
}
