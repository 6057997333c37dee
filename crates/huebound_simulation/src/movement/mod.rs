//! Movement domain: вертикальное движение и locomotion
//!
//! Чистые функции над `CharacterLocomotionState`:
//! - `vertical` - ground contact, гравитация, прыжок, таймауты
//! - `locomotion` - скорость, поворот, displacement, aim tracking
//!
//! Обёртки для ECS - в `systems`, plain хост зовёт функции напрямую.

pub mod locomotion;
pub mod systems;
pub mod vertical;

pub use locomotion::{resolve_locomotion, target_speed, track_aim_point, AimRay, LocomotionOutput};
pub use systems::{locomotion_system, vertical_motion_system};
pub use vertical::{apply_ground_contact, integrate_vertical, probe_ground};
