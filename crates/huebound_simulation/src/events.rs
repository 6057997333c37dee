//! Character events: дискретные cue для анимации/эффектов
//!
//! Генерируются стадиями tick'а (vertical motion, combat, footstep callback),
//! потребляются VisualFeedbackBridge (plain хост) или читаются из
//! `Events<CharacterCue>` (ECS хост).

use bevy::prelude::*;

use crate::components::CombatMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterEvent {
    /// Прыжок применён (velocity = jump velocity)
    Jumped,
    /// Переход airborne → grounded
    Landed { position: Vec3 },
    /// Fall timeout истёк (один раз за airborne эпизод)
    FreeFalling,
    /// Ground probe изменил результат
    Grounded { grounded: bool },
    /// Fire scheduler выстрелил; aim_point - последняя точка прицеливания
    ShotFired { aim_point: Option<Vec3> },
    /// Шаг из animation event (weight прошёл порог)
    Footstep { position: Vec3 },
    /// Переход Roaming ⇄ Aiming
    ModeChanged { mode: CombatMode },
}

/// Event: cue персонажа (ECS → host)
#[derive(Event, Debug, Clone, Copy)]
pub struct CharacterCue {
    pub entity: Entity,
    pub event: CharacterEvent,
}

/// Event: animation clip event от хоста (Host → ECS)
///
/// Godot/Bevy client пробрасывает footstep notify с весом клипа в blend tree.
#[derive(Event, Debug, Clone, Copy)]
pub struct FootstepNotify {
    pub entity: Entity,
    pub weight: f32,
}
