//! Внешние коллабораторы контроллера (узкие интерфейсы)
//!
//! Ядро не знает ни про движок, ни про аудио/частицы: всё что оно потребляет
//! или чем управляет - через эти traits. Хост (Godot node, Bevy client, тесты)
//! реализует их и передаёт в `ThirdPersonController` при создании.
//!
//! Все sink'и fire-and-forget: ничего не возвращают, ошибки не пробрасываются.

use bevy::prelude::*;

/// Источник ввода (polled каждый tick)
pub trait InputProvider {
    fn move_input(&self) -> Vec2;
    fn look_input(&self) -> Vec2;
    fn is_jumping(&self) -> bool;
    fn is_sprinting(&self) -> bool;
    fn is_firing(&self) -> bool;
    fn is_analog(&self) -> bool;
    /// Mouse-like устройство (look delta без масштабирования на dt)
    fn is_pointer_look(&self) -> bool {
        true
    }
}

/// Проверка земли под персонажем (sphere overlap)
pub trait GroundProbe {
    fn is_grounded(&self, position: Vec3, radius: f32, layer_mask: u32) -> bool;
}

/// Kinematic тело персонажа (capsule / character controller)
pub trait PhysicsMover {
    /// Единственная мутация тела за tick
    fn move_by(&mut self, displacement: Vec3);
    /// Velocity по результату предыдущего move_by
    fn velocity(&self) -> Vec3;
    fn position(&self) -> Vec3;
}

/// Physics raycast (aim assist)
pub trait RaycastQuery {
    /// `direction` нормализован; None если ничего не задели
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<Vec3>;
}

/// Именованные параметры аниматора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimParam {
    Speed,
    MotionSpeed,
    Grounded,
    Jump,
    FreeFall,
    Shooting,
}

impl AnimParam {
    pub fn name(&self) -> &'static str {
        match self {
            AnimParam::Speed => "Speed",
            AnimParam::MotionSpeed => "MotionSpeed",
            AnimParam::Grounded => "Grounded",
            AnimParam::Jump => "Jump",
            AnimParam::FreeFall => "FreeFall",
            AnimParam::Shooting => "Shooting",
        }
    }
}

pub trait AnimationSink {
    fn set_float(&mut self, param: AnimParam, value: f32);
    fn set_bool(&mut self, param: AnimParam, value: bool);
}

/// Follow target orbit камеры
pub trait CameraTarget {
    fn set_rotation(&mut self, rotation: Quat);
    /// World позиция target'а (origin луча из центра экрана)
    fn position(&self) -> Vec3;
}

/// Какой звук играть
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Landing,
    /// Индекс варианта клипа шага
    Footstep(usize),
}

pub trait AudioSink {
    fn play_one_shot(&mut self, cue: AudioCue, position: Vec3, volume: f32);
}

/// Частицы у ствола (ink stream)
pub trait ParticleSink {
    fn play(&mut self);
    fn stop(&mut self);
}

/// Camera shake (impulse source)
pub trait ImpulseSink {
    fn generate_impulse(&mut self);
}

/// Процедурный наклон оружия/рук
pub trait WeaponRig {
    /// Локальный pitch в градусах
    fn set_tilt(&mut self, degrees: f32);
}
