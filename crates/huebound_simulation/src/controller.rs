//! ThirdPersonController: plain хост ядра
//!
//! Для движков без ECS (Godot node, тестовый стенд): коллабораторы приходят
//! trait object'ами через builder, хост зовёт `advance(dt)` на каждый
//! simulation tick и `late_advance(dt)` после него.
//!
//! Порядок стадий `advance`:
//! 1. input (poll провайдера или значения сеттеров)
//! 2. ground probe → ground contact edge
//! 3. гравитация / прыжок (удержание кнопки не даёт повторного прыжка: timeout)
//! 4. locomotion → `PhysicsMover::move_by` (+ aim tracking в Aiming)
//! 5. combat: fire edge → scheduler
//! 6. наклон оружия
//! 7. feedback bridge разбирает events tick'а

use bevy::prelude::*;

use crate::camera::{aim_ray, orbit_rotation, update_orbit};
use crate::collaborators::{
    AnimationSink, AudioSink, CameraTarget, GroundProbe, ImpulseSink, InputProvider, ParticleSink, PhysicsMover,
    RaycastQuery, WeaponRig,
};
use crate::combat::{update_combat, update_weapon_tilt};
use crate::components::{CameraOrientationState, CharacterLocomotionState, CombatState, InputSnapshot};
use crate::config::ControllerConfig;
use crate::error::ConfigError;
use crate::events::CharacterEvent;
use crate::feedback::{footstep_event, FeedbackSinks, VisualFeedbackBridge};
use crate::logger;
use crate::movement::{
    apply_ground_contact, integrate_vertical, probe_ground, resolve_locomotion, track_aim_point,
};

/// Какие коллабораторы подключены (вычисляется один раз при build)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub input: bool,
    pub ground_probe: bool,
    pub mover: bool,
    pub raycast: bool,
    pub camera_target: bool,
    pub animation: bool,
    pub audio: bool,
    pub particles: bool,
    pub impulse: bool,
    pub weapon_rig: bool,
}

impl Capabilities {
    /// Что отключится без отсутствующих коллабораторов
    pub fn missing(&self) -> Vec<&'static str> {
        let checks = [
            (self.input, "input provider (driven by setters only)"),
            (self.ground_probe, "ground probe (character always airborne)"),
            (self.mover, "physics mover (no displacement applied)"),
            (self.raycast, "raycast (aim falls back to fixed distance)"),
            (self.camera_target, "camera target (orbit not applied)"),
            (self.animation, "animation sink"),
            (self.audio, "audio sink"),
            (self.particles, "particle sink"),
            (self.impulse, "impulse sink"),
            (self.weapon_rig, "weapon rig"),
        ];
        checks
            .into_iter()
            .filter(|(present, _)| !present)
            .map(|(_, name)| name)
            .collect()
    }
}

/// Builder: тюнинг + опциональные коллабораторы
pub struct ControllerBuilder {
    config: ControllerConfig,
    seed: u64,
    facing_yaw: f32,
    input: Option<Box<dyn InputProvider>>,
    ground_probe: Option<Box<dyn GroundProbe>>,
    mover: Option<Box<dyn PhysicsMover>>,
    raycast: Option<Box<dyn RaycastQuery>>,
    camera_target: Option<Box<dyn CameraTarget>>,
    sinks: FeedbackSinks,
}

impl ControllerBuilder {
    pub fn with_input(mut self, input: impl InputProvider + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    pub fn with_ground_probe(mut self, probe: impl GroundProbe + 'static) -> Self {
        self.ground_probe = Some(Box::new(probe));
        self
    }

    pub fn with_mover(mut self, mover: impl PhysicsMover + 'static) -> Self {
        self.mover = Some(Box::new(mover));
        self
    }

    pub fn with_raycast(mut self, raycast: impl RaycastQuery + 'static) -> Self {
        self.raycast = Some(Box::new(raycast));
        self
    }

    pub fn with_camera_target(mut self, target: impl CameraTarget + 'static) -> Self {
        self.camera_target = Some(Box::new(target));
        self
    }

    pub fn with_animation(mut self, sink: impl AnimationSink + 'static) -> Self {
        self.sinks.animation = Some(Box::new(sink));
        self
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.sinks.audio = Some(Box::new(sink));
        self
    }

    pub fn with_particles(mut self, sink: impl ParticleSink + 'static) -> Self {
        self.sinks.particles = Some(Box::new(sink));
        self
    }

    pub fn with_impulse(mut self, sink: impl ImpulseSink + 'static) -> Self {
        self.sinks.impulse = Some(Box::new(sink));
        self
    }

    pub fn with_weapon_rig(mut self, rig: impl WeaponRig + 'static) -> Self {
        self.sinks.weapon_rig = Some(Box::new(rig));
        self
    }

    /// Seed RNG для вариантов звука шагов
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Начальный heading персонажа (камера стартует с того же yaw)
    pub fn with_facing(mut self, yaw: f32) -> Self {
        self.facing_yaw = yaw;
        self
    }

    pub fn build(self) -> Result<ThirdPersonController, ConfigError> {
        if let Err(err) = self.config.validate() {
            logger::log_error(&format!("ThirdPersonController: rejected config: {}", err));
            return Err(err);
        }

        let capabilities = Capabilities {
            input: self.input.is_some(),
            ground_probe: self.ground_probe.is_some(),
            mover: self.mover.is_some(),
            raycast: self.raycast.is_some(),
            camera_target: self.camera_target.is_some(),
            animation: self.sinks.animation.is_some(),
            audio: self.sinks.audio.is_some(),
            particles: self.sinks.particles.is_some(),
            impulse: self.sinks.impulse.is_some(),
            weapon_rig: self.sinks.weapon_rig.is_some(),
        };
        for missing in capabilities.missing() {
            logger::log_warning(&format!("ThirdPersonController: no {}", missing));
        }

        let locomotion = CharacterLocomotionState::new(&self.config).with_facing(self.facing_yaw);
        let camera = CameraOrientationState::new(locomotion.facing_yaw);
        let mut feedback = VisualFeedbackBridge::new(self.sinks, self.config.feedback.clone(), self.seed);
        // Стартовое состояние аниматора: edge событий для него не будет
        feedback.dispatch(&CharacterEvent::Grounded {
            grounded: locomotion.grounded,
        });

        Ok(ThirdPersonController {
            config: self.config,
            locomotion,
            camera,
            combat: CombatState::default(),
            input: InputSnapshot::default(),
            input_provider: self.input,
            ground_probe: self.ground_probe,
            mover: self.mover,
            raycast: self.raycast,
            camera_target: self.camera_target,
            feedback,
            capabilities,
            events: Vec::new(),
        })
    }
}

/// Контроллер одного персонажа
///
/// Всё per-character состояние - owned поля; коллабораторы только через traits.
pub struct ThirdPersonController {
    config: ControllerConfig,
    locomotion: CharacterLocomotionState,
    camera: CameraOrientationState,
    combat: CombatState,
    input: InputSnapshot,
    input_provider: Option<Box<dyn InputProvider>>,
    ground_probe: Option<Box<dyn GroundProbe>>,
    mover: Option<Box<dyn PhysicsMover>>,
    raycast: Option<Box<dyn RaycastQuery>>,
    camera_target: Option<Box<dyn CameraTarget>>,
    feedback: VisualFeedbackBridge,
    capabilities: Capabilities,
    /// Events последнего tick'а (+ footstep callbacks после него)
    events: Vec<CharacterEvent>,
}

impl ThirdPersonController {
    pub fn builder(config: ControllerConfig) -> ControllerBuilder {
        ControllerBuilder {
            config,
            seed: 42,
            facing_yaw: 0.0,
            input: None,
            ground_probe: None,
            mover: None,
            raycast: None,
            camera_target: None,
            sinks: FeedbackSinks::default(),
        }
    }

    /// Simulation tick
    ///
    /// dt <= 0 или не finite → ничего не меняется (включая events прошлого tick'а).
    pub fn advance(&mut self, dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        self.events.clear();

        if let Some(provider) = self.input_provider.as_deref() {
            self.input = InputSnapshot::poll(provider);
        }

        let position = self.position();

        // Ground + vertical
        let grounded = probe_ground(self.ground_probe.as_deref(), &self.config.ground, position);
        apply_ground_contact(&mut self.locomotion, grounded, position, &mut self.events);
        integrate_vertical(&mut self.locomotion, &self.config.jump, self.input.jump, dt, &mut self.events);

        // Locomotion
        let velocity = self.mover.as_deref().map(|m| m.velocity()).unwrap_or(Vec3::ZERO);
        let output = resolve_locomotion(
            &mut self.locomotion,
            &self.config.locomotion,
            &self.input,
            self.combat.mode,
            self.camera.yaw,
            velocity,
            dt,
        );
        if let Some(mover) = self.mover.as_deref_mut() {
            mover.move_by(output.displacement);
        }
        self.feedback.push_motion(output.animation_speed, output.motion_speed);

        if self.combat.mode.is_aiming() {
            let ray = aim_ray(&self.camera, &self.config.camera, self.aim_origin(position));
            let aim_point = track_aim_point(
                &mut self.locomotion,
                &self.config.locomotion,
                ray,
                self.raycast.as_deref(),
                position,
                dt,
            );
            self.combat.aim_point = Some(aim_point);
        }

        // Combat
        update_combat(&mut self.combat, &self.config.combat, self.input.fire, dt, &mut self.events);
        let tilt = update_weapon_tilt(&mut self.combat, &self.config.combat, &self.config.camera, self.camera.pitch);
        self.feedback.set_weapon_tilt(tilt);

        for event in &self.events {
            self.feedback.dispatch(event);
        }
    }

    /// Late tick: orbit камеры
    pub fn late_advance(&mut self, dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        let (look, pointer) = match self.input_provider.as_deref() {
            Some(provider) => (provider.look_input(), provider.is_pointer_look()),
            None => (self.input.look_input, self.input.pointer_look),
        };

        update_orbit(&mut self.camera, &self.config.camera, look, pointer, dt);

        if let Some(target) = self.camera_target.as_deref_mut() {
            target.set_rotation(orbit_rotation(&self.camera, &self.config.camera));
        }
    }

    /// Animation clip event (footstep notify с весом клипа)
    pub fn on_footstep(&mut self, weight: f32) {
        let Some(event) = footstep_event(weight, self.position(), &self.config.feedback) else {
            return;
        };
        self.feedback.dispatch(&event);
        self.events.push(event);
    }

    // === Input setters (хост без InputProvider) ===

    pub fn set_move(&mut self, value: Vec2) {
        self.input.move_input = value;
    }

    pub fn set_look(&mut self, value: Vec2) {
        self.input.look_input = value;
    }

    pub fn set_jump(&mut self, pressed: bool) {
        self.input.jump = pressed;
    }

    pub fn set_sprint(&mut self, pressed: bool) {
        self.input.sprint = pressed;
    }

    pub fn set_fire(&mut self, pressed: bool) {
        self.input.fire = pressed;
    }

    pub fn set_analog(&mut self, analog: bool) {
        self.input.analog = analog;
    }

    pub fn set_pointer_look(&mut self, pointer: bool) {
        self.input.pointer_look = pointer;
    }

    // === Read-only state ===

    pub fn locomotion(&self) -> &CharacterLocomotionState {
        &self.locomotion
    }

    pub fn camera(&self) -> &CameraOrientationState {
        &self.camera
    }

    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Events последнего `advance` (и footstep'ы после него)
    pub fn last_events(&self) -> &[CharacterEvent] {
        &self.events
    }

    /// Позиция тела; без mover'а персонаж стоит в начале координат
    pub fn position(&self) -> Vec3 {
        self.mover.as_deref().map(|m| m.position()).unwrap_or(Vec3::ZERO)
    }

    fn aim_origin(&self, position: Vec3) -> Vec3 {
        match self.camera_target.as_deref() {
            Some(target) => target.position(),
            None => crate::camera::follow_point(position, &self.config.camera),
        }
    }
}
