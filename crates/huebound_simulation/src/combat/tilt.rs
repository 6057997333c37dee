//! Процедурный наклон оружия по pitch камеры

use crate::components::CombatState;
use crate::config::{CameraConfig, CombatConfig};
use crate::math;

/// Целевой наклон: pitch камеры → [-range, range] в Aiming, 0 в Roaming
pub fn weapon_tilt_target(state: &CombatState, combat: &CombatConfig, camera: &CameraConfig, pitch: f32) -> f32 {
    if !state.mode.is_aiming() {
        return 0.0;
    }
    let t = math::inverse_lerp(camera.bottom_clamp, camera.top_clamp, pitch);
    math::remap(t, 0.0, 1.0, -combat.weapon_tilt_range, combat.weapon_tilt_range)
}

/// Обновляет `weapon_tilt` (lerp по кратчайшей дуге) и возвращает новое значение
pub fn update_weapon_tilt(state: &mut CombatState, combat: &CombatConfig, camera: &CameraConfig, pitch: f32) -> f32 {
    let target = weapon_tilt_target(state, combat, camera, pitch);
    state.weapon_tilt = math::lerp_angle(state.weapon_tilt, target, combat.weapon_tilt_lerp);
    state.weapon_tilt
}
