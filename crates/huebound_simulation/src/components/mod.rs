//! ECS Components персонажа
//!
//! Организация по доменам:
//! - input: per-frame снимок ввода (InputSnapshot)
//! - locomotion: горизонталь/вертикаль + physics body (CharacterLocomotionState, PhysicsBody, GroundContact)
//! - camera: orbit камера (CameraOrientationState, CameraFollowTarget)
//! - combat: режим стрельбы и fire scheduler (CombatState, CombatMode)
//! - player: marker + animation параметры (Player, AnimationParams)
//!
//! Каждый блок состояния принадлежит ровно одному персонажу и мутируется
//! только из tick/late tick этого персонажа.

pub mod camera;
pub mod combat;
pub mod input;
pub mod locomotion;
pub mod player;

pub use camera::*;
pub use combat::*;
pub use input::*;
pub use locomotion::*;
pub use player::*;
