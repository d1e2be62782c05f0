//! Physics service boundary
//!
//! Solver живёт снаружи (engine). Здесь только:
//! - collision layers (rapier `Group`)
//! - [`PhysicsQueries`] — ray/overlap queries
//! - [`CharacterBody`] — velocity-bearing body
//! - headless stand-ins: [`SceneColliders`], [`SimBody`]

pub mod body;
pub mod layers;
pub mod queries;

// Re-export основных типов
pub use body::{CharacterBody, SimBody};
pub use queries::{ColliderHit, ColliderId, PhysicsQueries, RayHit, SceneColliders};
