//! Переходы режима и fire scheduler

use crate::components::{CombatMode, CombatState};
use crate::config::CombatConfig;
use crate::events::CharacterEvent;
use crate::logger;

/// Roaming → Aiming ("fire started")
pub fn enter_aiming(state: &mut CombatState, events: &mut Vec<CharacterEvent>) {
    state.mode = CombatMode::Aiming;
    state.fire_timer = 0.0;
    events.push(CharacterEvent::ModeChanged {
        mode: CombatMode::Aiming,
    });
    logger::log("Combat: Roaming → Aiming");
}

/// Aiming → Roaming ("fire stopped")
///
/// Scheduler отменяется синхронно: таймер в ноль, pending выстрела нет.
pub fn exit_aiming(state: &mut CombatState, events: &mut Vec<CharacterEvent>) {
    state.mode = CombatMode::Roaming;
    state.fire_timer = 0.0;
    state.shooting_flag = false;
    events.push(CharacterEvent::ModeChanged {
        mode: CombatMode::Roaming,
    });
    logger::log("Combat: Aiming → Roaming");
}

/// Fixed-rate scheduler; в Roaming таймер заморожен
///
/// Не больше одного выстрела за tick. После выстрела из таймера вычитается
/// интервал: остаток переносится на следующий выстрел, отставание не больше
/// одного интервала.
pub fn advance_fire_scheduler(
    state: &mut CombatState,
    config: &CombatConfig,
    dt: f32,
    events: &mut Vec<CharacterEvent>,
) {
    if !state.mode.is_aiming() {
        return;
    }

    state.fire_timer += dt;
    if state.fire_timer >= config.fire_interval {
        state.fire_timer = (state.fire_timer - config.fire_interval).clamp(0.0, config.fire_interval);
        state.shooting_flag = true;
        events.push(CharacterEvent::ShotFired {
            aim_point: state.aim_point,
        });
    }
}

/// Combat стадия tick'а: edge detection + scheduler
///
/// Press edge в tick'е N → Aiming и scheduler продвигается уже в этом tick'е.
/// Release edge → Roaming, scheduler в этом tick'е не продвигается.
pub fn update_combat(
    state: &mut CombatState,
    config: &CombatConfig,
    fire_pressed: bool,
    dt: f32,
    events: &mut Vec<CharacterEvent>,
) {
    if !(dt > 0.0 && dt.is_finite()) {
        return;
    }

    let pressed_edge = fire_pressed && !state.fire_held;
    let released_edge = !fire_pressed && state.fire_held;
    state.fire_held = fire_pressed;

    match state.mode {
        CombatMode::Roaming if pressed_edge => enter_aiming(state, events),
        CombatMode::Aiming if released_edge => {
            exit_aiming(state, events);
            return;
        }
        _ => {}
    }

    advance_fire_scheduler(state, config, dt, events);
}
