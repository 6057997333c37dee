//! Combat domain: ranged continuous fire
//!
//! Roaming (initial) ⇄ Aiming по фронтам кнопки огня:
//! - press → Aiming, scheduler стартует с нуля
//! - release → Roaming, scheduler отменяется в том же tick'е
//!
//! Scheduler - аккумулятор + mode флаг (никаких фоновых задач).
//! Выстрел - только cue (`ShotFired`); projectile/decal спавнит хост.

pub mod fire;
pub mod systems;
pub mod tilt;


pub use fire::{advance_fire_scheduler, enter_aiming, exit_aiming, update_combat};
pub use systems::combat_system;
pub use tilt::{update_weapon_tilt, weapon_tilt_target};
