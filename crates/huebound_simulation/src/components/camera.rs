//! Camera orbit компоненты

use bevy::prelude::*;

/// Ориентация orbit камеры
///
/// Инвариант: pitch в [bottom_clamp, top_clamp] после каждого update,
/// yaw в [-360, 360] (накопление, затем wrap - без сброса).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraOrientationState {
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraOrientationState {
    /// Начальный yaw берётся с camera target при spawn
    pub fn new(yaw: f32) -> Self {
        Self { yaw, pitch: 0.0 }
    }
}

/// Camera follow target (отдельная entity, позиционируется хостом)
///
/// Late tick пишет в её `Transform.rotation` ориентацию orbit камеры владельца;
/// её translation - origin луча прицеливания.
#[derive(Component, Debug, Clone, Copy)]
pub struct CameraFollowTarget {
    pub owner: Entity,
}
