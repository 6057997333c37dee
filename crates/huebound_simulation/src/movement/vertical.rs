//! VerticalMotionController: гравитация, прыжок, grounded/airborne таймауты
//!
//! Порядок внутри tick'а:
//! 1. `apply_ground_contact` - результат ground probe заменяет `grounded` (edge → events)
//! 2. `integrate_vertical` - гравитация, затем реакция на землю (stick / jump)
//!
//! Гравитация добавляется ДО stick-to-ground и прыжка: на земле после tick'а
//! скорость ровно равна stick константе, а после прыжка - ровно jump velocity.

use bevy::prelude::*;

use crate::collaborators::GroundProbe;
use crate::components::CharacterLocomotionState;
use crate::config::{GroundCheckConfig, JumpConfig};
use crate::events::CharacterEvent;

/// Спрашивает ground probe; отсутствующий probe = «не на земле»
pub fn probe_ground(probe: Option<&dyn GroundProbe>, config: &GroundCheckConfig, position: Vec3) -> bool {
    let Some(probe) = probe else {
        return false;
    };
    probe.is_grounded(
        config.probe_center(position),
        config.grounded_radius,
        config.ground_layers,
    )
}

/// Применяет результат ground probe
///
/// Events только на переходах:
/// - любое изменение → `Grounded { grounded }`
/// - airborne → grounded → дополнительно `Landed { position }`
pub fn apply_ground_contact(
    state: &mut CharacterLocomotionState,
    grounded: bool,
    position: Vec3,
    events: &mut Vec<CharacterEvent>,
) {
    if state.grounded == grounded {
        return;
    }

    state.grounded = grounded;
    events.push(CharacterEvent::Grounded { grounded });
    if grounded {
        events.push(CharacterEvent::Landed { position });
    }
}

/// Интегрирует вертикальную скорость за tick
///
/// `grounded` - вход (читается из state), этим шагом не меняется.
/// dt <= 0 или не finite → no-op.
pub fn integrate_vertical(
    state: &mut CharacterLocomotionState,
    config: &JumpConfig,
    jump_requested: bool,
    dt: f32,
    events: &mut Vec<CharacterEvent>,
) {
    if !(dt > 0.0 && dt.is_finite()) {
        return;
    }

    // Ограничение только сверху: падение не клампится
    if state.vertical_velocity < config.terminal_velocity {
        state.vertical_velocity += config.gravity * dt;
    }

    if state.grounded {
        state.fall_timeout_remaining = config.fall_timeout;
        state.free_fall_announced = false;

        if state.vertical_velocity < 0.0 {
            state.vertical_velocity = config.stick_to_ground_velocity;
        }

        if jump_requested && state.jump_timeout_remaining <= 0.0 {
            state.vertical_velocity = config.jump_velocity();
            // Probe ещё видит землю пару tick'ов после отрыва:
            // взводим timeout, чтобы удержанная кнопка не дала второй Jumped
            state.jump_timeout_remaining = config.jump_timeout;
            events.push(CharacterEvent::Jumped);
        }

        state.jump_timeout_remaining = (state.jump_timeout_remaining - dt).max(0.0);
    } else {
        state.jump_timeout_remaining = config.jump_timeout;
        state.fall_timeout_remaining = (state.fall_timeout_remaining - dt).max(0.0);

        if state.fall_timeout_remaining <= 0.0 && !state.free_fall_announced {
            state.free_fall_announced = true;
            events.push(CharacterEvent::FreeFalling);
        }
    }
}
