//! Combat boundary (bash hits)
//!
//! ECS ответственность:
//! - hit volume + overlap query (в контроллере)
//! - доставка directional impact через [`EnemyRegistry`]
//!
//! Внешняя ответственность:
//! - реакция врага (knockback, damage, stagger)

pub mod receiver;

// Re-export основных типов
pub use receiver::{AttackReceiver, Enemy, EnemyRegistry, EnemyRoster, HitPolicy};
