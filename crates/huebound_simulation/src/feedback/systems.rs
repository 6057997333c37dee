//! Feedback ECS systems
//!
//! ECS хост не держит sink'ов: animation параметры зеркалятся в
//! `AnimationParams`, звуки уходят наружу как `SoundCue` events.

use bevy::prelude::*;

use crate::collaborators::AudioCue;
use crate::components::{AnimationParams, Player};
use crate::config::ControllerConfig;
use crate::events::{CharacterCue, FootstepNotify};
use crate::DeterministicRng;

use super::{apply_animation_cue, audio_cue_for, footstep_event};

/// Event: one-shot звук для хоста (ECS → host)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub entity: Entity,
    pub cue: AudioCue,
    pub position: Vec3,
    pub volume: f32,
}

/// Система: animation clip notify → `Footstep` cue
pub fn footstep_notify_system(
    mut notifies: EventReader<FootstepNotify>,
    mut cues: EventWriter<CharacterCue>,
    query: Query<(&Transform, &ControllerConfig), With<Player>>,
) {
    for notify in notifies.read() {
        let Ok((transform, config)) = query.get(notify.entity) else {
            continue;
        };
        if let Some(event) = footstep_event(notify.weight, transform.translation, &config.feedback) {
            cues.write(CharacterCue {
                entity: notify.entity,
                event,
            });
        }
    }
}

/// Система: `CharacterCue` → `AnimationParams` + `SoundCue`
///
/// Последняя в FixedUpdate цепочке.
pub fn feedback_system(
    mut cues: EventReader<CharacterCue>,
    mut sounds: EventWriter<SoundCue>,
    mut rng: ResMut<DeterministicRng>,
    mut query: Query<(&ControllerConfig, &mut AnimationParams)>,
) {
    for cue in cues.read() {
        let Ok((config, mut params)) = query.get_mut(cue.entity) else {
            continue;
        };

        apply_animation_cue(&mut *params, &cue.event);

        if let Some((sound, position)) = audio_cue_for(&cue.event, &config.feedback, &mut rng) {
            sounds.write(SoundCue {
                entity: cue.entity,
                cue: sound,
                position,
                volume: config.feedback.footstep_volume,
            });
        }
    }
}
