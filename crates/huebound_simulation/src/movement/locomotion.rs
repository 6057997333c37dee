//! LocomotionResolver: скорость, поворот, итоговый displacement
//!
//! Два режима направления:
//! - **Roaming:** персонаж доворачивается к camera-relative направлению ввода
//!   (smooth damp), а движение идёт по forward ЦЕЛЕВОГО поворота - направление
//!   меняется мгновенно, визуальный поворот догоняет.
//! - **Aiming:** без авто-поворота, strafe в локальном базисе персонажа;
//!   отдельно `track_aim_point` доворачивает персонажа к точке прицеливания (slerp).

use bevy::prelude::*;

use crate::collaborators::RaycastQuery;
use crate::components::{CharacterLocomotionState, CombatMode, InputSnapshot};
use crate::config::LocomotionConfig;
use crate::math;

/// Результат locomotion стадии за tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionOutput {
    /// Displacement для physics collaborator'а (уже умножен на dt)
    pub displacement: Vec3,
    /// Параметр Speed для аниматора
    pub animation_speed: f32,
    /// Параметр MotionSpeed для аниматора
    pub motion_speed: f32,
}

/// Целевая скорость: sprint/walk, 0 без ввода
pub fn target_speed(config: &LocomotionConfig, input: &InputSnapshot) -> f32 {
    if !input.has_move_input() {
        return 0.0;
    }
    if input.sprint {
        config.sprint_speed
    } else {
        config.move_speed
    }
}

/// Считает displacement за tick и обновляет speed/blend/поворот
///
/// `current_velocity` - velocity тела по итогам ПРЕДЫДУЩЕГО physics step.
pub fn resolve_locomotion(
    state: &mut CharacterLocomotionState,
    config: &LocomotionConfig,
    input: &InputSnapshot,
    mode: CombatMode,
    camera_yaw: f32,
    current_velocity: Vec3,
    dt: f32,
) -> LocomotionOutput {
    let target = target_speed(config, input);
    let input_magnitude = input.input_magnitude();
    let current_horizontal = Vec3::new(current_velocity.x, 0.0, current_velocity.z).length();

    if current_horizontal < target - config.speed_offset
        || current_horizontal > target + config.speed_offset
    {
        let speed = math::lerp(
            current_horizontal,
            target * input_magnitude,
            dt * config.speed_change_rate,
        );
        // Округление гасит осцилляцию около target
        state.horizontal_speed = math::round_to_thousandths(speed).max(0.0);
    } else {
        state.horizontal_speed = target;
    }

    state.animation_blend = math::lerp(state.animation_blend, target, dt * config.speed_change_rate);
    if state.animation_blend < config.animation_blend_floor {
        state.animation_blend = 0.0;
    }

    let move_input = input.move_input;

    if mode == CombatMode::Roaming && input.has_move_input() {
        let input_angle = move_input.x.atan2(move_input.y).to_degrees();
        state.target_rotation = math::normalize_heading(input_angle + camera_yaw);

        let rotation = math::smooth_damp_angle(
            state.facing_yaw,
            state.target_rotation,
            &mut state.rotation_velocity,
            config.rotation_smooth_time,
            dt,
        );
        state.facing_yaw = math::normalize_heading(rotation);
    }

    let direction = match mode {
        CombatMode::Aiming => {
            math::heading_forward(state.facing_yaw) * move_input.y
                + math::heading_right(state.facing_yaw) * move_input.x
        }
        CombatMode::Roaming => math::heading_forward(state.target_rotation),
    };

    let displacement = direction.normalize_or_zero() * (state.horizontal_speed * dt)
        + Vec3::new(0.0, state.vertical_velocity, 0.0) * dt;
    state.last_displacement = displacement;

    LocomotionOutput {
        displacement,
        animation_speed: state.animation_blend,
        motion_speed: input_magnitude,
    }
}

/// Луч из центра экрана (camera target → forward камеры)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl AimRay {
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Aiming: находит точку прицеливания и доворачивает персонажа к ней
///
/// Raycast промахнулся (или не подключён) → точка на `aim_fallback_distance`.
/// Поворот только по горизонтали, slerp с фактором `aim_turn_rate * dt`.
pub fn track_aim_point(
    state: &mut CharacterLocomotionState,
    config: &LocomotionConfig,
    ray: AimRay,
    raycast: Option<&dyn RaycastQuery>,
    character_position: Vec3,
    dt: f32,
) -> Vec3 {
    let aim_point = raycast
        .and_then(|query| query.raycast(ray.origin, ray.direction))
        .unwrap_or_else(|| ray.point_at(config.aim_fallback_distance));

    // Точка прямо над/под персонажем - горизонтального направления нет
    let Some(target_yaw) = math::heading_of(aim_point - character_position) else {
        return aim_point;
    };

    let from = math::heading_rotation(state.facing_yaw);
    let to = math::heading_rotation(target_yaw);
    let rotated = from.slerp(to, (config.aim_turn_rate * dt).clamp(0.0, 1.0));

    if let Some(yaw) = math::heading_from_rotation(rotated) {
        state.facing_yaw = math::normalize_heading(yaw);
    }

    aim_point
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const EPS: f32 = 1e-4;

    struct WallAt {
        point: Vec3,
    }

    impl RaycastQuery for WallAt {
        fn raycast(&self, _origin: Vec3, _direction: Vec3) -> Option<Vec3> {
            Some(self.point)
        }
    }

    fn forward_input() -> InputSnapshot {
        InputSnapshot {
            move_input: Vec2::new(0.0, 1.0),
            ..default()
        }
    }

    #[test]
    fn test_target_speed_selection() {
        let config = LocomotionConfig::default();
        let mut input = forward_input();
        assert_eq!(target_speed(&config, &input), 2.0);

        input.sprint = true;
        assert_eq!(target_speed(&config, &input), 5.335);

        input.move_input = Vec2::ZERO;
        assert_eq!(target_speed(&config, &input), 0.0);
    }

    #[test]
    fn test_forward_roaming_moves_along_world_forward() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();

        let output = resolve_locomotion(
            &mut state,
            &config,
            &forward_input(),
            CombatMode::Roaming,
            0.0,
            Vec3::ZERO,
            0.1,
        );

        assert_eq!(state.target_rotation, 0.0);
        let horizontal = Vec3::new(output.displacement.x, 0.0, output.displacement.z);
        assert!(horizontal.length() > 0.0);
        assert!(horizontal.normalize().abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn test_roaming_direction_uses_target_not_lagging_facing() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();
        let right = InputSnapshot {
            move_input: Vec2::new(1.0, 0.0),
            ..default()
        };

        let output = resolve_locomotion(
            &mut state,
            &config,
            &right,
            CombatMode::Roaming,
            0.0,
            Vec3::new(0.0, 0.0, -2.0),
            DT,
        );

        assert!((state.target_rotation - 90.0).abs() < EPS);
        // Визуальный поворот ещё догоняет
        assert!(state.facing_yaw > 0.0 && state.facing_yaw < 90.0);
        // А движение уже вправо
        let horizontal = Vec3::new(output.displacement.x, 0.0, output.displacement.z);
        assert!(horizontal.normalize().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn test_camera_yaw_rotates_input() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();

        resolve_locomotion(&mut state, &config, &forward_input(), CombatMode::Roaming, 90.0, Vec3::ZERO, DT);
        assert!((state.target_rotation - 90.0).abs() < EPS);
    }

    #[test]
    fn test_speed_snaps_inside_offset() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();

        resolve_locomotion(
            &mut state,
            &config,
            &forward_input(),
            CombatMode::Roaming,
            0.0,
            Vec3::new(0.0, 0.0, -1.95),
            DT,
        );
        assert_eq!(state.horizontal_speed, 2.0);
    }

    #[test]
    fn test_speed_accelerates_with_rounding() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();

        resolve_locomotion(&mut state, &config, &forward_input(), CombatMode::Roaming, 0.0, Vec3::ZERO, 0.05);

        // lerp(0, 2, 0.5) = 1.0
        assert!((state.horizontal_speed - 1.0).abs() < 1e-6);
        let rounded = (state.horizontal_speed * 1000.0).round() / 1000.0;
        assert_eq!(state.horizontal_speed, rounded);
    }

    #[test]
    fn test_analog_input_scales_speed_target() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();
        let half_stick = InputSnapshot {
            move_input: Vec2::new(0.0, 0.5),
            analog: true,
            ..default()
        };

        let output = resolve_locomotion(&mut state, &config, &half_stick, CombatMode::Roaming, 0.0, Vec3::ZERO, 1.0);

        // t = 10 → clamp 1 → target * magnitude
        assert!((state.horizontal_speed - 1.0).abs() < 1e-6);
        assert!((output.motion_speed - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_animation_blend_floors_to_zero() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState {
            animation_blend: 0.011,
            ..default()
        };

        let output = resolve_locomotion(
            &mut state,
            &config,
            &InputSnapshot::default(),
            CombatMode::Roaming,
            0.0,
            Vec3::ZERO,
            DT,
        );

        assert_eq!(state.animation_blend, 0.0);
        assert_eq!(output.animation_speed, 0.0);
    }

    #[test]
    fn test_vertical_velocity_added_to_displacement() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState {
            vertical_velocity: -2.0,
            ..default()
        };

        let output = resolve_locomotion(
            &mut state,
            &config,
            &InputSnapshot::default(),
            CombatMode::Roaming,
            0.0,
            Vec3::ZERO,
            0.1,
        );

        assert!((output.displacement.y + 0.2).abs() < 1e-6);
        assert_eq!(state.last_displacement, output.displacement);
    }

    #[test]
    fn test_aiming_strafes_without_turning() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default().with_facing(90.0);
        let strafe_right = InputSnapshot {
            move_input: Vec2::new(1.0, 0.0),
            ..default()
        };

        let output = resolve_locomotion(
            &mut state,
            &config,
            &strafe_right,
            CombatMode::Aiming,
            0.0,
            Vec3::new(2.0, 0.0, 0.0),
            DT,
        );

        assert!((state.facing_yaw - 90.0).abs() < EPS);
        // facing +X → right = +Z
        let horizontal = Vec3::new(output.displacement.x, 0.0, output.displacement.z);
        assert!(horizontal.normalize().abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn test_aiming_without_input_does_not_move_horizontally() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();

        let output = resolve_locomotion(
            &mut state,
            &config,
            &InputSnapshot::default(),
            CombatMode::Aiming,
            0.0,
            Vec3::new(0.0, 0.0, -3.0),
            DT,
        );

        assert_eq!(output.displacement.x, 0.0);
        assert_eq!(output.displacement.z, 0.0);
    }

    #[test]
    fn test_aim_point_falls_back_to_fixed_distance() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();
        let ray = AimRay {
            origin: Vec3::new(0.0, 1.5, 0.0),
            direction: Vec3::NEG_Z,
        };

        let point = track_aim_point(&mut state, &config, ray, None, Vec3::ZERO, DT);

        assert!(point.abs_diff_eq(Vec3::new(0.0, 1.5, -70.0), EPS));
        assert!(state.facing_yaw.abs() < EPS);
    }

    #[test]
    fn test_aim_rotation_slerps_toward_hit() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default();
        let wall = WallAt {
            point: Vec3::new(10.0, 1.0, 0.0),
        };
        let ray = AimRay {
            origin: Vec3::new(0.0, 1.5, 0.0),
            direction: Vec3::X,
        };

        // 10 * 0.05 = 0.5 → половина пути к 90°
        let point = track_aim_point(&mut state, &config, ray, Some(&wall), Vec3::ZERO, 0.05);

        assert_eq!(point, wall.point);
        assert!((state.facing_yaw - 45.0).abs() < 0.01);

        // Большой dt → clamp 1 → ровно к цели
        track_aim_point(&mut state, &config, ray, Some(&wall), Vec3::ZERO, 1.0);
        assert!((state.facing_yaw - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_aim_point_straight_above_keeps_facing() {
        let config = LocomotionConfig::default();
        let mut state = CharacterLocomotionState::default().with_facing(30.0);
        let ceiling = WallAt {
            point: Vec3::new(0.0, 5.0, 0.0),
        };
        let ray = AimRay {
            origin: Vec3::ZERO,
            direction: Vec3::Y,
        };

        track_aim_point(&mut state, &config, ray, Some(&ceiling), Vec3::ZERO, DT);
        assert!((state.facing_yaw - 30.0).abs() < EPS);
    }
}
