//! Movement ECS systems (FixedUpdate)
//!
//! Порядок в цепочке (см. `SimulationPlugin`):
//! physics feedback → `vertical_motion_system` → `locomotion_system` →
//! physics submit. Состояние персонажа - компоненты на его entity.

use bevy::prelude::*;

use crate::camera::{aim_ray, follow_point};
use crate::components::{
    AnimationParams, CameraOrientationState, CharacterLocomotionState, CombatState, GroundContact,
    InputSnapshot, PhysicsBody, Player,
};
use crate::config::ControllerConfig;
use crate::events::{CharacterCue, CharacterEvent};
use crate::math;
use crate::physics::AimRaycaster;

use super::{apply_ground_contact, integrate_vertical, resolve_locomotion, track_aim_point};

/// Система: ground contact edge + гравитация/прыжок
pub fn vertical_motion_system(
    time: Res<Time<Fixed>>,
    mut cues: EventWriter<CharacterCue>,
    mut query: Query<
        (
            Entity,
            &InputSnapshot,
            &ControllerConfig,
            &GroundContact,
            &Transform,
            &mut CharacterLocomotionState,
        ),
        With<Player>,
    >,
) {
    let delta = time.delta_secs();
    let mut events: Vec<CharacterEvent> = Vec::new();

    for (entity, input, config, contact, transform, mut state) in query.iter_mut() {
        apply_ground_contact(&mut state, contact.grounded, transform.translation, &mut events);
        integrate_vertical(&mut state, &config.jump, input.jump, delta, &mut events);

        for event in events.drain(..) {
            cues.write(CharacterCue { entity, event });
        }
    }
}

/// Система: скорость/поворот → `PhysicsBody::pending_displacement`
///
/// В Aiming дополнительно трассирует луч из центра экрана
/// (`AimRaycaster` если есть, иначе fallback точка).
pub fn locomotion_system(
    time: Res<Time<Fixed>>,
    raycaster: Option<Res<AimRaycaster>>,
    mut query: Query<
        (
            &InputSnapshot,
            &ControllerConfig,
            &CameraOrientationState,
            &mut CombatState,
            &mut PhysicsBody,
            &mut Transform,
            &mut CharacterLocomotionState,
            &mut AnimationParams,
        ),
        With<Player>,
    >,
) {
    let delta = time.delta_secs();

    for (input, config, orbit, mut combat, mut body, mut transform, mut state, mut params) in query.iter_mut() {
        let output = resolve_locomotion(
            &mut state,
            &config.locomotion,
            input,
            combat.mode,
            orbit.yaw,
            body.velocity,
            delta,
        );
        body.pending_displacement = Some(output.displacement);

        if combat.mode.is_aiming() {
            let origin = follow_point(transform.translation, &config.camera);
            let ray = aim_ray(orbit, &config.camera, origin);
            let raycast = raycaster.as_deref().map(AimRaycaster::query);
            combat.aim_point = Some(track_aim_point(
                &mut state,
                &config.locomotion,
                ray,
                raycast,
                transform.translation,
                delta,
            ));
        }

        transform.rotation = math::heading_rotation(state.facing_yaw);
        params.speed = output.animation_speed;
        params.motion_speed = output.motion_speed;
    }
}
