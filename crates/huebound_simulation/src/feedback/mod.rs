//! VisualFeedbackBridge: character events → аниматор / аудио / частицы / shake
//!
//! Единственное внутреннее состояние - RNG для выбора варианта звука шага.
//! Отсутствующий sink просто пропускается: feedback никогда не ломает симуляцию.

use bevy::prelude::*;
use rand::Rng;

use crate::collaborators::{
    AnimParam, AnimationSink, AudioCue, AudioSink, ImpulseSink, ParticleSink, WeaponRig,
};
use crate::components::CombatMode;
use crate::config::FeedbackConfig;
use crate::events::CharacterEvent;
use crate::DeterministicRng;

pub mod systems;

pub use systems::{feedback_system, footstep_notify_system, SoundCue};

/// Fire-and-forget коллабораторы (все опциональны)
#[derive(Default)]
pub struct FeedbackSinks {
    pub animation: Option<Box<dyn AnimationSink>>,
    pub audio: Option<Box<dyn AudioSink>>,
    pub particles: Option<Box<dyn ParticleSink>>,
    pub impulse: Option<Box<dyn ImpulseSink>>,
    pub weapon_rig: Option<Box<dyn WeaponRig>>,
}

/// Animation параметры для event'а
///
/// Общая часть plain bridge и ECS `AnimationParams`.
pub fn apply_animation_cue(animation: &mut dyn AnimationSink, event: &CharacterEvent) {
    match event {
        CharacterEvent::Jumped => animation.set_bool(AnimParam::Jump, true),
        CharacterEvent::FreeFalling => animation.set_bool(AnimParam::FreeFall, true),
        CharacterEvent::Grounded { grounded } => {
            animation.set_bool(AnimParam::Grounded, *grounded);
            if *grounded {
                animation.set_bool(AnimParam::Jump, false);
                animation.set_bool(AnimParam::FreeFall, false);
            }
        }
        CharacterEvent::ShotFired { .. } => animation.set_bool(AnimParam::Shooting, true),
        CharacterEvent::ModeChanged {
            mode: CombatMode::Roaming,
        } => animation.set_bool(AnimParam::Shooting, false),
        _ => {}
    }
}

/// Вариант клипа шага; None если вариантов нет
pub fn pick_footstep_variant(rng: &mut DeterministicRng, variants: usize) -> Option<usize> {
    if variants == 0 {
        return None;
    }
    Some(rng.rng.gen_range(0..variants))
}

/// Звук для event'а (landing / footstep)
pub fn audio_cue_for(
    event: &CharacterEvent,
    config: &FeedbackConfig,
    rng: &mut DeterministicRng,
) -> Option<(AudioCue, Vec3)> {
    match event {
        CharacterEvent::Landed { position } => Some((AudioCue::Landing, *position)),
        CharacterEvent::Footstep { position } => {
            pick_footstep_variant(rng, config.footstep_variants).map(|variant| (AudioCue::Footstep(variant), *position))
        }
        _ => None,
    }
}

/// Footstep из animation clip event
///
/// Клипы в blend tree шлют notify все одновременно - звучит только доминирующий
/// (weight выше порога). Позиция - центр капсулы.
pub fn footstep_event(weight: f32, character_position: Vec3, config: &FeedbackConfig) -> Option<CharacterEvent> {
    if weight > config.animation_event_weight {
        Some(CharacterEvent::Footstep {
            position: character_position + Vec3::Y * config.center_height,
        })
    } else {
        None
    }
}

/// Plain-host bridge: раздаёт events в boxed sinks
pub struct VisualFeedbackBridge {
    sinks: FeedbackSinks,
    config: FeedbackConfig,
    rng: DeterministicRng,
}

impl VisualFeedbackBridge {
    pub fn new(sinks: FeedbackSinks, config: FeedbackConfig, seed: u64) -> Self {
        Self {
            sinks,
            config,
            rng: DeterministicRng::new(seed),
        }
    }

    pub fn dispatch(&mut self, event: &CharacterEvent) {
        if let Some(animation) = self.sinks.animation.as_deref_mut() {
            apply_animation_cue(animation, event);
        }

        if let Some((cue, position)) = audio_cue_for(event, &self.config, &mut self.rng) {
            if let Some(audio) = self.sinks.audio.as_deref_mut() {
                audio.play_one_shot(cue, position, self.config.footstep_volume);
            }
        }

        match event {
            CharacterEvent::ShotFired { .. } => {
                if let Some(impulse) = self.sinks.impulse.as_deref_mut() {
                    impulse.generate_impulse();
                }
            }
            CharacterEvent::ModeChanged { mode } => {
                if let Some(particles) = self.sinks.particles.as_deref_mut() {
                    match mode {
                        CombatMode::Aiming => particles.play(),
                        CombatMode::Roaming => particles.stop(),
                    }
                }
            }
            _ => {}
        }
    }

    /// Speed / MotionSpeed после locomotion стадии
    pub fn push_motion(&mut self, speed: f32, motion_speed: f32) {
        if let Some(animation) = self.sinks.animation.as_deref_mut() {
            animation.set_float(AnimParam::Speed, speed);
            animation.set_float(AnimParam::MotionSpeed, motion_speed);
        }
    }

    pub fn set_weapon_tilt(&mut self, degrees: f32) {
        if let Some(rig) = self.sinks.weapon_rig.as_deref_mut() {
            rig.set_tilt(degrees);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AnimationParams;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        sounds: Vec<(AudioCue, Vec3, f32)>,
        particles: Vec<&'static str>,
        impulses: usize,
    }

    struct Recorder(Rc<RefCell<Recorded>>);

    impl AudioSink for Recorder {
        fn play_one_shot(&mut self, cue: AudioCue, position: Vec3, volume: f32) {
            self.0.borrow_mut().sounds.push((cue, position, volume));
        }
    }

    impl ParticleSink for Recorder {
        fn play(&mut self) {
            self.0.borrow_mut().particles.push("play");
        }

        fn stop(&mut self) {
            self.0.borrow_mut().particles.push("stop");
        }
    }

    impl ImpulseSink for Recorder {
        fn generate_impulse(&mut self) {
            self.0.borrow_mut().impulses += 1;
        }
    }

    fn recording_bridge(config: FeedbackConfig) -> (VisualFeedbackBridge, Rc<RefCell<Recorded>>) {
        let log = Rc::new(RefCell::new(Recorded::default()));
        let sinks = FeedbackSinks {
            audio: Some(Box::new(Recorder(log.clone()))),
            particles: Some(Box::new(Recorder(log.clone()))),
            impulse: Some(Box::new(Recorder(log.clone()))),
            ..default()
        };
        (VisualFeedbackBridge::new(sinks, config, 42), log)
    }

    #[test]
    fn test_grounded_clears_jump_and_free_fall() {
        let mut params = AnimationParams::default();

        apply_animation_cue(&mut params, &CharacterEvent::Jumped);
        apply_animation_cue(&mut params, &CharacterEvent::FreeFalling);
        assert!(params.jump && params.free_fall);

        apply_animation_cue(&mut params, &CharacterEvent::Grounded { grounded: true });
        assert!(params.grounded);
        assert!(!params.jump && !params.free_fall);
    }

    #[test]
    fn test_leaving_ground_keeps_jump_flag() {
        let mut params = AnimationParams::default();

        apply_animation_cue(&mut params, &CharacterEvent::Jumped);
        apply_animation_cue(&mut params, &CharacterEvent::Grounded { grounded: false });

        assert!(params.jump);
        assert!(!params.grounded);
    }

    #[test]
    fn test_shooting_flag_follows_combat_cues() {
        let mut params = AnimationParams::default();

        apply_animation_cue(&mut params, &CharacterEvent::ShotFired { aim_point: None });
        apply_animation_cue(&mut params, &CharacterEvent::ShotFired { aim_point: None });
        assert!(params.shooting);

        apply_animation_cue(&mut params, &CharacterEvent::ModeChanged { mode: CombatMode::Roaming });
        assert!(!params.shooting);
    }

    #[test]
    fn test_footstep_needs_dominant_weight() {
        let config = FeedbackConfig::default();

        assert!(footstep_event(0.5, Vec3::ZERO, &config).is_none());
        assert_eq!(
            footstep_event(0.8, Vec3::new(1.0, 0.0, 2.0), &config),
            Some(CharacterEvent::Footstep {
                position: Vec3::new(1.0, 0.93, 2.0)
            })
        );
    }

    #[test]
    fn test_footstep_variants_are_deterministic() {
        let mut a = DeterministicRng::new(7);
        let mut b = DeterministicRng::new(7);

        let first: Vec<_> = (0..16).map(|_| pick_footstep_variant(&mut a, 10)).collect();
        let second: Vec<_> = (0..16).map(|_| pick_footstep_variant(&mut b, 10)).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|v| matches!(v, Some(i) if *i < 10)));
        assert_eq!(pick_footstep_variant(&mut a, 0), None);
    }

    #[test]
    fn test_bridge_routes_sounds_and_effects() {
        let (mut bridge, log) = recording_bridge(FeedbackConfig::default());
        let landing = Vec3::new(0.0, 0.0, 5.0);

        bridge.dispatch(&CharacterEvent::Landed { position: landing });
        bridge.dispatch(&CharacterEvent::ModeChanged { mode: CombatMode::Aiming });
        bridge.dispatch(&CharacterEvent::ShotFired { aim_point: None });
        bridge.dispatch(&CharacterEvent::ShotFired { aim_point: None });
        bridge.dispatch(&CharacterEvent::ModeChanged { mode: CombatMode::Roaming });

        let log = log.borrow();
        assert_eq!(log.sounds, vec![(AudioCue::Landing, landing, 0.5)]);
        assert_eq!(log.particles, vec!["play", "stop"]);
        assert_eq!(log.impulses, 2);
    }

    #[test]
    fn test_footstep_sound_skipped_without_variants() {
        let config = FeedbackConfig {
            footstep_variants: 0,
            ..default()
        };
        let (mut bridge, log) = recording_bridge(config);

        bridge.dispatch(&CharacterEvent::Footstep { position: Vec3::ZERO });

        assert!(log.borrow().sounds.is_empty());
    }

    #[test]
    fn test_missing_sinks_are_skipped() {
        let mut bridge = VisualFeedbackBridge::new(FeedbackSinks::default(), FeedbackConfig::default(), 1);

        bridge.dispatch(&CharacterEvent::Jumped);
        bridge.dispatch(&CharacterEvent::Footstep { position: Vec3::ZERO });
        bridge.push_motion(2.0, 1.0);
        bridge.set_weapon_tilt(10.0);
    }
}
