//! Combat ECS system (FixedUpdate)

use bevy::prelude::*;

use crate::components::{CameraOrientationState, CombatState, InputSnapshot, Player};
use crate::config::ControllerConfig;
use crate::events::{CharacterCue, CharacterEvent};

use super::{update_combat, update_weapon_tilt};

/// Система: fire edge → режим → scheduler → наклон оружия
///
/// Pitch камеры берётся с прошлого late tick'а.
pub fn combat_system(
    time: Res<Time<Fixed>>,
    mut cues: EventWriter<CharacterCue>,
    mut query: Query<
        (
            Entity,
            &InputSnapshot,
            &ControllerConfig,
            &CameraOrientationState,
            &mut CombatState,
        ),
        With<Player>,
    >,
) {
    let delta = time.delta_secs();
    let mut events: Vec<CharacterEvent> = Vec::new();

    for (entity, input, config, orbit, mut combat) in query.iter_mut() {
        update_combat(&mut combat, &config.combat, input.fire, delta, &mut events);
        update_weapon_tilt(&mut combat, &config.combat, &config.camera, orbit.pitch);

        for event in events.drain(..) {
            cues.write(CharacterCue { entity, event });
        }
    }
}
