//! Тюнинг контроллера персонажа
//!
//! Дефолты сняты с игрового тюнинга (third-person starter rig).
//! Каждый блок `#[serde(default)]` - в RON можно указывать только изменённые поля.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Полный тюнинг одного персонажа
///
/// Component: у каждого персонажа может быть свой тюнинг.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub locomotion: LocomotionConfig,
    pub jump: JumpConfig,
    pub ground: GroundCheckConfig,
    pub camera: CameraConfig,
    pub combat: CombatConfig,
    pub feedback: FeedbackConfig,
}

/// Горизонтальное движение и поворот
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Скорость шага (m/s)
    pub move_speed: f32,
    /// Скорость спринта (m/s)
    pub sprint_speed: f32,
    /// Time constant для smooth damp поворота в Roaming (секунды)
    pub rotation_smooth_time: f32,
    /// Ускорение/торможение (lerp rate в секунду)
    pub speed_change_rate: f32,
    /// Зона в которой скорость просто снапится к target
    pub speed_offset: f32,
    /// Animation blend ниже этого значения обнуляется (idle micro-twitch)
    pub animation_blend_floor: f32,
    /// Slerp rate поворота к точке прицеливания в Aiming
    pub aim_turn_rate: f32,
    /// Дистанция fallback точки если aim raycast ничего не нашёл
    pub aim_fallback_distance: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            sprint_speed: 5.335,
            rotation_smooth_time: 0.12,
            speed_change_rate: 10.0,
            speed_offset: 0.1,
            animation_blend_floor: 0.01,
            aim_turn_rate: 10.0,
            aim_fallback_distance: 70.0,
        }
    }
}

/// Вертикальное движение: прыжок, гравитация, таймауты
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Высота прыжка (метры)
    pub jump_height: f32,
    /// Собственная гравитация персонажа (m/s², отрицательная)
    pub gravity: f32,
    /// Пауза между прыжками (секунды на земле)
    pub jump_timeout: f32,
    /// Сколько секунд в воздухе до FreeFall (лестницы, кочки)
    pub fall_timeout: f32,
    /// Гравитация добавляется только пока velocity ниже этого значения
    pub terminal_velocity: f32,
    /// Вертикальная скорость на земле (прижимает к полу)
    pub stick_to_ground_velocity: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_height: 1.2,
            gravity: -15.0,
            jump_timeout: 0.5,
            fall_timeout: 0.15,
            terminal_velocity: 53.0,
            stick_to_ground_velocity: -2.0,
        }
    }
}

impl JumpConfig {
    /// Начальная скорость для заданной высоты: v = sqrt(h * -2 * g)
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).sqrt()
    }
}

/// Параметры ground probe (сфера под ногами)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundCheckConfig {
    /// Смещение центра сферы: center.y = position.y - grounded_offset
    pub grounded_offset: f32,
    pub grounded_radius: f32,
    /// Bitmask слоёв, которые считаются землёй
    pub ground_layers: u32,
}

impl Default for GroundCheckConfig {
    fn default() -> Self {
        Self {
            grounded_offset: -0.14,
            grounded_radius: 0.28,
            ground_layers: u32::MAX,
        }
    }
}

impl GroundCheckConfig {
    pub fn probe_center(&self, position: Vec3) -> Vec3 {
        Vec3::new(position.x, position.y - self.grounded_offset, position.z)
    }
}

/// Orbit камера (yaw/pitch)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Максимальный pitch вверх (градусы)
    pub top_clamp: f32,
    /// Максимальный pitch вниз (градусы)
    pub bottom_clamp: f32,
    /// Добавка к pitch при записи в camera target
    pub camera_angle_override: f32,
    pub lock_camera_position: bool,
    /// Look input короче этого считается шумом
    pub look_threshold: f32,
    /// Высота follow target'а над позицией персонажа (ECS хост)
    pub follow_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            top_clamp: 70.0,
            bottom_clamp: -30.0,
            camera_angle_override: 0.0,
            lock_camera_position: false,
            look_threshold: 0.01,
            follow_height: 1.375,
        }
    }
}

/// Continuous fire + процедурный наклон оружия
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Интервал между выстрелами (секунды)
    pub fire_interval: f32,
    /// Наклон оружия в крайних положениях pitch (± градусы)
    pub weapon_tilt_range: f32,
    /// Lerp factor наклона за tick
    pub weapon_tilt_lerp: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            fire_interval: 0.05,
            weapon_tilt_range: 25.0,
            weapon_tilt_lerp: 0.3,
        }
    }
}

/// Audio feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub footstep_volume: f32,
    /// Количество вариантов footstep клипа у хоста (0 = без звука шагов)
    pub footstep_variants: usize,
    /// Высота центра капсулы (точка воспроизведения шагов/приземления)
    pub center_height: f32,
    /// Animation event weight выше которого играем звук
    pub animation_event_weight: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            footstep_volume: 0.5,
            footstep_variants: 10,
            center_height: 0.93,
            animation_event_weight: 0.5,
        }
    }
}

impl ControllerConfig {
    /// Парсит RON тюнинг и валидирует его
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        let jump = &self.jump;

        let finite = [
            ("locomotion.move_speed", loco.move_speed),
            ("locomotion.sprint_speed", loco.sprint_speed),
            ("locomotion.rotation_smooth_time", loco.rotation_smooth_time),
            ("locomotion.speed_change_rate", loco.speed_change_rate),
            ("locomotion.speed_offset", loco.speed_offset),
            ("locomotion.animation_blend_floor", loco.animation_blend_floor),
            ("locomotion.aim_turn_rate", loco.aim_turn_rate),
            ("locomotion.aim_fallback_distance", loco.aim_fallback_distance),
            ("jump.jump_height", jump.jump_height),
            ("jump.gravity", jump.gravity),
            ("jump.jump_timeout", jump.jump_timeout),
            ("jump.fall_timeout", jump.fall_timeout),
            ("jump.terminal_velocity", jump.terminal_velocity),
            ("jump.stick_to_ground_velocity", jump.stick_to_ground_velocity),
            ("ground.grounded_offset", self.ground.grounded_offset),
            ("ground.grounded_radius", self.ground.grounded_radius),
            ("camera.top_clamp", self.camera.top_clamp),
            ("camera.bottom_clamp", self.camera.bottom_clamp),
            ("camera.camera_angle_override", self.camera.camera_angle_override),
            ("camera.look_threshold", self.camera.look_threshold),
            ("camera.follow_height", self.camera.follow_height),
            ("combat.fire_interval", self.combat.fire_interval),
            ("combat.weapon_tilt_range", self.combat.weapon_tilt_range),
            ("combat.weapon_tilt_lerp", self.combat.weapon_tilt_lerp),
            ("feedback.footstep_volume", self.feedback.footstep_volume),
            ("feedback.center_height", self.feedback.center_height),
            ("feedback.animation_event_weight", self.feedback.animation_event_weight),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        let non_negative = [
            ("locomotion.move_speed", loco.move_speed),
            ("locomotion.sprint_speed", loco.sprint_speed),
            ("locomotion.rotation_smooth_time", loco.rotation_smooth_time),
            ("locomotion.speed_change_rate", loco.speed_change_rate),
            ("locomotion.aim_fallback_distance", loco.aim_fallback_distance),
            ("jump.jump_height", jump.jump_height),
            ("jump.jump_timeout", jump.jump_timeout),
            ("jump.fall_timeout", jump.fall_timeout),
            ("ground.grounded_radius", self.ground.grounded_radius),
            ("camera.look_threshold", self.camera.look_threshold),
            ("feedback.footstep_volume", self.feedback.footstep_volume),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if jump.gravity >= 0.0 {
            return Err(ConfigError::NonNegativeGravity(jump.gravity));
        }

        if self.combat.fire_interval <= 0.0 {
            return Err(ConfigError::NonPositiveFireInterval(self.combat.fire_interval));
        }

        if self.camera.bottom_clamp > self.camera.top_clamp {
            return Err(ConfigError::InvertedPitchClamp {
                bottom: self.camera.bottom_clamp,
                top: self.camera.top_clamp,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.locomotion.sprint_speed, 5.335);
        assert_eq!(config.jump.terminal_velocity, 53.0);
        assert_eq!(config.combat.fire_interval, 0.05);
    }

    #[test]
    fn test_jump_velocity_formula() {
        let jump = JumpConfig::default();
        // sqrt(1.2 * 30) = 6.0
        assert!((jump.jump_velocity() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_probe_center_uses_offset() {
        let ground = GroundCheckConfig::default();
        let center = ground.probe_center(Vec3::new(1.0, 0.0, 2.0));
        assert!((center.y - 0.14).abs() < 1e-6);
        assert_eq!(center.x, 1.0);
        assert_eq!(center.z, 2.0);
    }

    #[test]
    fn test_inverted_clamp_rejected() {
        let mut config = ControllerConfig::default();
        config.camera.bottom_clamp = 80.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedPitchClamp { .. })
        ));
    }

    #[test]
    fn test_zero_fire_interval_rejected() {
        let mut config = ControllerConfig::default();
        config.combat.fire_interval = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveFireInterval(_))
        ));
    }

    #[test]
    fn test_positive_gravity_rejected() {
        let mut config = ControllerConfig::default();
        config.jump.gravity = 9.81;
        assert!(matches!(config.validate(), Err(ConfigError::NonNegativeGravity(_))));
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = ControllerConfig::default();
        config.locomotion.move_speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "locomotion.move_speed" })
        ));
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let text = "(combat: (fire_interval: 0.1), camera: (top_clamp: 60.0))";
        let config = ControllerConfig::from_ron_str(text).expect("valid tuning");

        assert_eq!(config.combat.fire_interval, 0.1);
        assert_eq!(config.camera.top_clamp, 60.0);
        assert_eq!(config.camera.bottom_clamp, -30.0);
        assert_eq!(config.locomotion.move_speed, 2.0);
    }

    #[test]
    fn test_invalid_ron_reports_parse_error() {
        let result = ControllerConfig::from_ron_str("(combat: (fire_interval: ))");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_ron_with_invalid_values_rejected() {
        let result = ControllerConfig::from_ron_str("(combat: (fire_interval: -1.0))");
        assert!(matches!(result, Err(ConfigError::NonPositiveFireInterval(_))));
    }
}
