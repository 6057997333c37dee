//! CameraOrbit: yaw/pitch из look input (late tick)
//!
//! Работает отдельно от simulation tick: plain хост зовёт из `late_advance`,
//! ECS хост - в `PostUpdate`, после всех FixedUpdate шагов кадра.

use bevy::prelude::*;

use crate::components::{CameraFollowTarget, CameraOrientationState, InputSnapshot, Player};
use crate::config::{CameraConfig, ControllerConfig};
use crate::math;
use crate::movement::AimRay;

/// Накопление look input
///
/// - Mouse-like ввод (`pointer`) - дельта как есть, stick - умножаем на dt.
/// - Yaw сворачивается в [-360, 360], pitch сворачивается и клампится.
/// - Clamp применяется даже когда ввод пропущен (lock / шум).
pub fn update_orbit(state: &mut CameraOrientationState, config: &CameraConfig, look: Vec2, pointer: bool, dt: f32) {
    let threshold = config.look_threshold * config.look_threshold;
    if !config.lock_camera_position && look.length_squared() >= threshold {
        let multiplier = if pointer { 1.0 } else { dt };
        state.yaw += look.x * multiplier;
        state.pitch += look.y * multiplier;
    }

    state.yaw = math::wrap_angle(state.yaw);
    state.pitch = math::clamp_angle(state.pitch, config.bottom_clamp, config.top_clamp);
}

/// Поворот follow target'а: (pitch + override, yaw, 0)
pub fn orbit_rotation(state: &CameraOrientationState, config: &CameraConfig) -> Quat {
    math::camera_rotation(state.pitch + config.camera_angle_override, state.yaw)
}

/// Луч из центра экрана: от follow target'а вдоль forward камеры
pub fn aim_ray(state: &CameraOrientationState, config: &CameraConfig, origin: Vec3) -> AimRay {
    AimRay {
        origin,
        direction: (orbit_rotation(state, config) * Vec3::NEG_Z).normalize_or(Vec3::NEG_Z),
    }
}

/// Позиция follow target'а для персонажа без внешнего CameraTarget
pub fn follow_point(character_position: Vec3, config: &CameraConfig) -> Vec3 {
    character_position + Vec3::Y * config.follow_height
}

/// Система: orbit камеры + синхронизация follow target entities
///
/// Работает в PostUpdate (late tick), dt - virtual time кадра.
pub fn camera_orbit_system(
    time: Res<Time>,
    mut players: Query<
        (&InputSnapshot, &ControllerConfig, &mut CameraOrientationState, &Transform),
        With<Player>,
    >,
    mut targets: Query<(&CameraFollowTarget, &mut Transform), Without<Player>>,
) {
    let delta = time.delta_secs();
    if !(delta > 0.0 && delta.is_finite()) {
        return;
    }

    for (input, config, mut orbit, _) in players.iter_mut() {
        update_orbit(&mut orbit, &config.camera, input.look_input, input.pointer_look, delta);
    }

    for (target, mut transform) in targets.iter_mut() {
        let Ok((_, config, orbit, owner_transform)) = players.get(target.owner) else {
            continue;
        };
        transform.translation = follow_point(owner_transform.translation, &config.camera);
        transform.rotation = orbit_rotation(orbit, &config.camera);
    }
}
