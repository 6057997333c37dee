//! Player marker + animation параметры

use bevy::prelude::*;

use crate::collaborators::{AnimParam, AnimationSink};

/// Marker component для player-controlled entity
///
/// Системы контроллера работают только по `With<Player>`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Зеркало именованных параметров аниматора
///
/// Для хостов которые читают параметры каждый frame вместо вызовов sink'а
/// (Godot AnimationTree sync, debug overlay).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationParams {
    pub speed: f32,
    pub motion_speed: f32,
    pub grounded: bool,
    pub jump: bool,
    pub free_fall: bool,
    pub shooting: bool,
}

impl AnimationSink for AnimationParams {
    fn set_float(&mut self, param: AnimParam, value: f32) {
        match param {
            AnimParam::Speed => self.speed = value,
            AnimParam::MotionSpeed => self.motion_speed = value,
            // bool параметры через float не пишем
            _ => {}
        }
    }

    fn set_bool(&mut self, param: AnimParam, value: bool) {
        match param {
            AnimParam::Grounded => self.grounded = value,
            AnimParam::Jump => self.jump = value,
            AnimParam::FreeFall => self.free_fall = value,
            AnimParam::Shooting => self.shooting = value,
            _ => {}
        }
    }
}
