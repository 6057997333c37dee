//! Physics module
//!
//! Адаптер внешнего physics collaborator'а для ECS хоста: rapier kinematic
//! character controller или headless интегратор. Коллизии и интеграция тел:
//! не наша забота, ядро только отдаёт displacement и читает результат.

pub mod movement;

// Re-export основных типов
pub use movement::{
    probe_headless_ground, spawn_player_character, submit_displacement, sync_rapier_output, AimRaycaster,
    BodyBackend, HeadlessGround,
};
