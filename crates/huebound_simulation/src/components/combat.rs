//! Combat компоненты: режим и continuous fire scheduler

use bevy::prelude::*;

/// Режим персонажа
///
/// - **Roaming:** свободное движение, персонаж разворачивается по направлению ввода
/// - **Aiming:** fire зажат - strafe относительно facing, поворот к точке прицеливания
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum CombatMode {
    #[default]
    Roaming,
    Aiming,
}

impl CombatMode {
    pub fn is_aiming(&self) -> bool {
        matches!(self, CombatMode::Aiming)
    }
}

/// Состояние стрельбы
///
/// Инварианты:
/// - fire_timer растёт только в Aiming
/// - переход в Roaming обнуляет fire_timer в том же tick'е (выстрел не «долетает»)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatState {
    pub mode: CombatMode,
    /// Время с последнего выстрела (секунды)
    pub fire_timer: f32,
    /// Уровень fire кнопки в прошлом tick'е (для edge detection)
    pub fire_held: bool,
    /// Анимационный флаг Shooting
    pub shooting_flag: bool,
    /// Последняя точка прицеливания (Aiming)
    pub aim_point: Option<Vec3>,
    /// Процедурный наклон оружия по pitch камеры (градусы)
    pub weapon_tilt: f32,
}
