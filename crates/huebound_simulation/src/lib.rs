//! Huebound Simulation Core
//!
//! Third-person персонаж: locomotion, orbit камера, continuous fire.
//! Ядро - чистые функции над owned state (детерминированно, без рендера).
//!
//! Два хоста одного ядра:
//! - `ThirdPersonController` - plain facade (`advance` / `late_advance`),
//!   коллабораторы через traits (Godot node, тестовый стенд)
//! - `SimulationPlugin` - Bevy ECS: state в компонентах, стадии в FixedUpdate,
//!   камера в PostUpdate, physics через rapier kinematic controller

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod camera;
pub mod collaborators;
pub mod combat;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod feedback;
pub mod logger;
pub mod math;
pub mod movement;
pub mod physics;

// Re-export для удобства хостов
pub use collaborators::*;
pub use components::*;
pub use config::{
    CameraConfig, CombatConfig, ControllerConfig, FeedbackConfig, GroundCheckConfig, JumpConfig, LocomotionConfig,
};
pub use controller::{Capabilities, ControllerBuilder, ThirdPersonController};
pub use error::ConfigError;
pub use events::{CharacterCue, CharacterEvent, FootstepNotify};
pub use feedback::{FeedbackSinks, SoundCue, VisualFeedbackBridge};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{spawn_player_character, AimRaycaster, BodyBackend, HeadlessGround};

/// Главный plugin симуляции
///
/// FixedUpdate (simulation tick), строго последовательно:
/// 1. physics feedback (rapier output / headless ground probe)
/// 2. vertical motion (ground edge, гравитация, прыжок)
/// 3. locomotion (displacement intent, aim tracking)
/// 4. physics submit (единственная мутация тела)
/// 5. combat (fire edge, scheduler, наклон оружия)
/// 6. footstep notify → cue
/// 7. feedback (AnimationParams + SoundCue)
///
/// PostUpdate (late tick): orbit камеры + follow target.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_event::<CharacterCue>()
            .add_event::<FootstepNotify>()
            .add_event::<SoundCue>();

        // Детерминистичный RNG (seed по умолчанию), если хост не вставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_systems(
            FixedUpdate,
            (
                physics::sync_rapier_output,
                physics::probe_headless_ground,
                movement::vertical_motion_system,
                movement::locomotion_system,
                physics::submit_displacement,
                combat::combat_system,
                feedback::footstep_notify_system,
                feedback::feedback_system,
            )
                .chain(), // Последовательное выполнение
        );

        app.add_systems(PostUpdate, camera::camera_orbit_system);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug формат как сериализация (f32 печатаются точно)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
