//! Character abilities: phantom dash + briefcase bash.
//!
//! # Architecture
//!
//! **Ability state (pure data):**
//! - `DashState`: timer-driven lerp between two points
//! - `BashState`: timer-driven spin + height sweep, hit window after delay
//!
//! **Controller (side effects):**
//! - collision/gravity toggles, effects, overlap queries, enemy notification
//!
//! # Lifecycle
//!
//! ```text
//! trigger → ActiveAbility::Dash | Bash (created)
//!   ↓
//! advance(dt) каждый кадр (mutated)
//!   ↓
//! finished → ActiveAbility::None (state dropped, effect detached/stopped)
//! ```
//!
//! Одновременно активна максимум одна способность.

pub mod bash;
pub mod curves;
pub mod dash;

#[cfg(test)]
mod dash_tests;

use serde::{Deserialize, Serialize};

pub use bash::{BashPose, BashState};
pub use curves::SpinCurve;
pub use dash::{DashState, DashStep};

/// Ability discriminant (for events and diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    Dash,
    Bash,
}

/// Exclusive ability slot of a character.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveAbility {
    #[default]
    None,
    Dash(DashState),
    Bash(BashState),
}

impl ActiveAbility {
    pub fn kind(&self) -> Option<AbilityKind> {
        match self {
            ActiveAbility::None => None,
            ActiveAbility::Dash(_) => Some(AbilityKind::Dash),
            ActiveAbility::Bash(_) => Some(AbilityKind::Bash),
        }
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self, ActiveAbility::Dash(_))
    }

    pub fn is_bashing(&self) -> bool {
        matches!(self, ActiveAbility::Bash(_))
    }
}
