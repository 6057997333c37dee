//! Headless демо Huebound
//!
//! Скриптованная сессия через ECS хост без рендера:
//! шаг → спринт → прыжок → прицеливание с огнём → отпускание.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use huebound_simulation::{
    create_headless_app, log_error, log_info, spawn_player_character, BodyBackend, CharacterCue, CharacterLocomotionState,
    CombatState, ControllerConfig, HeadlessGround, InputSnapshot, Player, SimulationPlugin, SoundCue,
};

const TICKS: u32 = 600;

/// Ввод на tick (60 Hz)
fn scripted_input(tick: u32) -> InputSnapshot {
    let mut input = InputSnapshot::default();
    match tick {
        0..=119 => input.move_input = Vec2::Y,
        120..=239 => {
            input.move_input = Vec2::new(0.5, 1.0);
            input.sprint = true;
        }
        240..=245 => {
            input.move_input = Vec2::Y;
            input.jump = true;
        }
        300..=419 => {
            input.move_input = Vec2::X;
            input.fire = true;
            input.look_input = Vec2::new(0.5, 0.1);
        }
        _ => {}
    }
    input
}

fn apply_script(mut tick: Local<u32>, mut query: Query<&mut InputSnapshot, With<Player>>) {
    for mut input in query.iter_mut() {
        *input = scripted_input(*tick);
    }
    *tick += 1;
}

fn log_cues(mut cues: EventReader<CharacterCue>, mut sounds: EventReader<SoundCue>) {
    for cue in cues.read() {
        log_info(&format!("cue {:?}: {:?}", cue.entity, cue.event));
    }
    for sound in sounds.read() {
        log_info(&format!("sound {:?} at {:?}", sound.cue, sound.position));
    }
}

fn main() {
    let seed = 42;
    log_info(&format!("Starting Huebound headless simulation (seed: {})", seed));

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(HeadlessGround::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_systems(PreUpdate, apply_script)
        .add_systems(Last, log_cues);

    let player = match spawn_player_character(
        &mut app.world_mut().commands(),
        Vec3::ZERO,
        0.0,
        ControllerConfig::default(),
        BodyBackend::Headless,
    ) {
        Ok(entity) => entity,
        Err(err) => {
            log_error(&format!("Demo aborted: {}", err));
            return;
        }
    };
    app.world_mut().flush();

    for tick in 0..TICKS {
        app.update();

        if tick % 100 == 0 {
            if let Some(transform) = app.world().get::<Transform>(player) {
                log_info(&format!("Tick {}: position {:?}", tick, transform.translation));
            }
        }
    }

    let world = app.world();
    if let (Some(state), Some(combat)) = (
        world.get::<CharacterLocomotionState>(player),
        world.get::<CombatState>(player),
    ) {
        log_info(&format!(
            "Simulation complete: speed {:.3}, facing {:.1}°, mode {:?}",
            state.horizontal_speed, state.facing_yaw, combat.mode
        ));
    }
}
