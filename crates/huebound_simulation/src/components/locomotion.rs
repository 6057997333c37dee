//! Locomotion компоненты: состояние движения, physics body, ground contact

use bevy::prelude::*;

use crate::config::ControllerConfig;

/// Состояние движения персонажа (горизонталь + вертикаль)
///
/// Инварианты:
/// - horizontal_speed ≥ 0
/// - jump/fall таймеры ≥ 0 (clamp при декременте)
/// - facing_yaw в [0, 360) после каждого поворота
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterLocomotionState {
    /// Сглаженная горизонтальная скорость (m/s)
    pub horizontal_speed: f32,
    /// Вертикальная скорость (m/s, + вверх)
    pub vertical_velocity: f32,
    /// Текущий heading персонажа (градусы)
    pub facing_yaw: f32,
    /// Последний результат ground probe
    pub grounded: bool,
    pub jump_timeout_remaining: f32,
    pub fall_timeout_remaining: f32,

    /// Heading к которому поворачиваемся в Roaming (и направление движения)
    pub target_rotation: f32,
    /// Угловая скорость smooth damp (состояние между tick'ами)
    pub rotation_velocity: f32,
    /// Значение Speed для анимации (отдельное сглаживание)
    pub animation_blend: f32,
    /// FreeFalling уже отправлен в этом airborne эпизоде
    pub free_fall_announced: bool,
    /// Displacement последнего tick'а (отданный physics collaborator'у)
    pub last_displacement: Vec3,
}

impl CharacterLocomotionState {
    /// Состояние на spawn: на земле, таймеры взведены
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            horizontal_speed: 0.0,
            vertical_velocity: 0.0,
            facing_yaw: 0.0,
            grounded: true,
            jump_timeout_remaining: config.jump.jump_timeout,
            fall_timeout_remaining: config.jump.fall_timeout,
            target_rotation: 0.0,
            rotation_velocity: 0.0,
            animation_blend: 0.0,
            free_fall_announced: false,
            last_displacement: Vec3::ZERO,
        }
    }

    /// Ставит heading (spawn/teleport), сбрасывая smooth damp
    pub fn with_facing(mut self, yaw: f32) -> Self {
        self.facing_yaw = crate::math::normalize_heading(yaw);
        self.target_rotation = self.facing_yaw;
        self.rotation_velocity = 0.0;
        self
    }
}

impl Default for CharacterLocomotionState {
    fn default() -> Self {
        Self::new(&ControllerConfig::default())
    }
}

/// Physics body персонажа (ECS сторона)
///
/// - `velocity`: результат ПРЕДЫДУЩЕГО physics step (effective translation / dt)
/// - `pending_displacement`: displacement этого tick'а, забирается physics адаптером
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub pending_displacement: Option<Vec3>,
}

/// Ground probe результат для ECS хоста
///
/// Пишется physics адаптером (rapier output) или тестами напрямую.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct GroundContact {
    pub grounded: bool,
}
