//! Скалярная/угловая математика для контроллера
//!
//! Конвенции:
//! - Углы в градусах.
//! - Heading (yaw) по часовой стрелке если смотреть сверху: 0° = forward (-Z, как
//!   `Transform::forward()` в Bevy), 90° = right (+X).
//! - Pitch положительный = взгляд вниз.

use bevy::prelude::*;

/// Lerp с clamp параметра в [0, 1]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Обратный lerp с clamp результата в [0, 1]; вырожденный диапазон даёт 0
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Линейно переносит value из [from1, to1] в [from2, to2] (без clamp)
pub fn remap(value: f32, from1: f32, to1: f32, from2: f32, to2: f32) -> f32 {
    (value - from1) / (to1 - from1) * (to2 - from2) + from2
}

/// Зацикливает t в [0, length]
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Кратчайшая разница между углами, результат в (-180, 180]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Lerp угла по кратчайшей дуге
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    a + delta_angle(a, b) * t.clamp(0.0, 1.0)
}

/// Сворачивает угол в [-360, 360]; внутри диапазона значение не трогается
pub fn wrap_angle(angle: f32) -> f32 {
    if angle.abs() > 360.0 {
        angle % 360.0
    } else {
        angle
    }
}

/// Wrap в [-360, 360] и затем clamp в [min, max]
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    wrap_angle(angle).clamp(min, max)
}

/// Heading в [0, 360)
pub fn normalize_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid(-1e-8) может вернуть ровно 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn round_to_thousandths(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// Critically damped spring к target (smooth damp)
///
/// `velocity` - состояние между вызовами. dt <= 0 → no-op.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Не проскакиваем target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}

/// Smooth damp по кратчайшей дуге
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Поворот персонажа вокруг Y для heading (градусы)
pub fn heading_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(-yaw.to_radians())
}

pub fn heading_forward(yaw: f32) -> Vec3 {
    let radians = yaw.to_radians();
    Vec3::new(radians.sin(), 0.0, -radians.cos())
}

pub fn heading_right(yaw: f32) -> Vec3 {
    let radians = yaw.to_radians();
    Vec3::new(radians.cos(), 0.0, radians.sin())
}

/// Heading горизонтальной проекции direction; None для вертикального/нулевого вектора
pub fn heading_of(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(direction.x.atan2(-direction.z).to_degrees())
}

/// Heading из поворота (forward проецируется на XZ)
pub fn heading_from_rotation(rotation: Quat) -> Option<f32> {
    heading_of(rotation * Vec3::NEG_Z)
}

/// Поворот камеры (pitch, yaw, 0)
pub fn camera_rotation(pitch: f32, yaw: f32) -> Quat {
    heading_rotation(yaw) * Quat::from_rotation_x(-pitch.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_delta_angle_shortest_path() {
        assert!((delta_angle(350.0, 10.0) - 20.0).abs() < EPS);
        assert!((delta_angle(10.0, 350.0) + 20.0).abs() < EPS);
        assert!((delta_angle(0.0, 180.0) - 180.0).abs() < EPS);
    }

    #[test]
    fn test_wrap_and_clamp_angle() {
        assert_eq!(wrap_angle(370.0), 10.0);
        assert_eq!(wrap_angle(-370.0), -10.0);
        assert_eq!(wrap_angle(360.0), 360.0);
        assert!(wrap_angle(10_000.0).abs() <= 360.0);
        assert_eq!(clamp_angle(100.0, -30.0, 70.0), 70.0);
        assert_eq!(clamp_angle(-100.0, -30.0, 70.0), -30.0);
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(450.0), 90.0);
        assert_eq!(normalize_heading(0.0), 0.0);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..200 {
            value = smooth_damp(value, 90.0, &mut velocity, 0.12, 1.0 / 60.0);
            assert!(value <= 90.0 + EPS);
        }
        assert!((value - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_noop() {
        let mut velocity = 3.0;
        let value = smooth_damp(10.0, 50.0, &mut velocity, 0.12, 0.0);
        assert_eq!(value, 10.0);
        assert_eq!(velocity, 3.0);
    }

    #[test]
    fn test_smooth_damp_angle_takes_short_arc() {
        let mut velocity = 0.0;
        let value = smooth_damp_angle(350.0, 10.0, &mut velocity, 0.12, 1.0 / 60.0);
        // Идём через 360, а не назад через 180
        assert!(value > 350.0);
    }

    #[test]
    fn test_heading_conventions() {
        assert!(heading_forward(0.0).abs_diff_eq(Vec3::NEG_Z, EPS));
        assert!(heading_forward(90.0).abs_diff_eq(Vec3::X, EPS));
        assert!(heading_right(0.0).abs_diff_eq(Vec3::X, EPS));
        assert!((heading_rotation(90.0) * Vec3::NEG_Z).abs_diff_eq(Vec3::X, EPS));
        assert!((heading_of(Vec3::X).unwrap_or_default() - 90.0).abs() < EPS);
        assert!(heading_of(Vec3::Y).is_none());
    }

    #[test]
    fn test_camera_rotation_positive_pitch_looks_down() {
        let forward = camera_rotation(30.0, 0.0) * Vec3::NEG_Z;
        assert!(forward.y < 0.0);
        let heading = heading_from_rotation(camera_rotation(30.0, 45.0)).unwrap_or_default();
        assert!((heading - 45.0).abs() < EPS);
    }

    #[test]
    fn test_inverse_lerp_and_remap() {
        assert_eq!(inverse_lerp(-30.0, 70.0, 20.0), 0.5);
        assert_eq!(inverse_lerp(5.0, 5.0, 5.0), 0.0);
        assert_eq!(remap(0.5, 0.0, 1.0, -25.0, 25.0), 0.0);
        assert_eq!(remap(1.0, 0.0, 1.0, -25.0, 25.0), 25.0);
    }

    #[test]
    fn test_round_to_thousandths() {
        assert!((round_to_thousandths(1.23456) - 1.235).abs() < 1e-6);
    }
}
