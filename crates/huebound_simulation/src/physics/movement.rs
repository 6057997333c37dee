//! Physics collaborator для ECS хоста
//!
//! Два backend'а за одним интерфейсом (`PhysicsBody` + `GroundContact`):
//! - **Rapier:** `KinematicCharacterController` (KinematicPositionBased capsule).
//!   Displacement уходит в `controller.translation`, grounded и фактическая
//!   velocity читаются из `KinematicCharacterControllerOutput` в начале
//!   следующего tick'а.
//! - **Headless:** без rapier (тесты, demo). Transform += displacement,
//!   земля - плоскость `HeadlessGround`.
//!
//! Rapier step хост подключает сам (`RapierPhysicsPlugin`); ядро только
//! заполняет intent и читает результат.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::collaborators::{GroundProbe, RaycastQuery};
use crate::components::{
    AnimationParams, CameraFollowTarget, CameraOrientationState, CharacterLocomotionState, CombatState,
    GroundContact, InputSnapshot, PhysicsBody, Player,
};
use crate::config::ControllerConfig;
use crate::error::ConfigError;
use crate::logger;
use crate::math;

/// Плоскость земли для headless backend'а (y = height)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct HeadlessGround {
    pub height: f32,
}

impl Default for HeadlessGround {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl GroundProbe for HeadlessGround {
    fn is_grounded(&self, position: Vec3, radius: f32, _layer_mask: u32) -> bool {
        position.y - radius <= self.height
    }
}

/// Raycast для aim луча (хост подставляет свою реализацию)
#[derive(Resource)]
pub struct AimRaycaster(pub Box<dyn RaycastQuery + Send + Sync>);

impl AimRaycaster {
    pub fn new(query: impl RaycastQuery + Send + Sync + 'static) -> Self {
        Self(Box::new(query))
    }

    pub fn query(&self) -> &dyn RaycastQuery {
        self.0.as_ref()
    }
}

/// Каким backend'ом двигать персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyBackend {
    #[default]
    Headless,
    Rapier,
}

/// Система: результат rapier step'а → GroundContact / PhysicsBody
///
/// Velocity - фактически пройденный путь прошлого tick'а / dt.
pub fn sync_rapier_output(
    time: Res<Time<Fixed>>,
    mut query: Query<(&KinematicCharacterControllerOutput, &mut GroundContact, &mut PhysicsBody)>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (output, mut contact, mut body) in query.iter_mut() {
        contact.grounded = output.grounded;
        body.velocity = output.effective_translation / delta;
    }
}

/// Система: ground probe для headless тел
///
/// Нет `HeadlessGround` → персонаж всегда в воздухе.
pub fn probe_headless_ground(
    ground: Option<Res<HeadlessGround>>,
    mut query: Query<(&Transform, &ControllerConfig, &mut GroundContact), Without<KinematicCharacterController>>,
) {
    for (transform, config, mut contact) in query.iter_mut() {
        contact.grounded = crate::movement::probe_ground(
            ground.as_deref().map(|g| g as &dyn GroundProbe),
            &config.ground,
            transform.translation,
        );
    }
}

/// Система: pending displacement → rapier controller / Transform
///
/// Единственная мутация тела за tick.
pub fn submit_displacement(
    time: Res<Time<Fixed>>,
    ground: Option<Res<HeadlessGround>>,
    mut query: Query<(&mut PhysicsBody, &mut Transform, Option<&mut KinematicCharacterController>)>,
) {
    let delta = time.delta_secs();

    for (mut body, mut transform, controller) in query.iter_mut() {
        let Some(displacement) = body.pending_displacement.take() else {
            continue;
        };

        if let Some(mut controller) = controller {
            controller.translation = Some(displacement);
            continue;
        }

        let before = transform.translation;
        let mut after = before + displacement;
        // Headless «коллизия»: не проваливаемся под плоскость
        if let Some(ground) = ground.as_deref() {
            after.y = after.y.max(ground.height);
        }
        transform.translation = after;

        if delta > 0.0 {
            body.velocity = (after - before) / delta;
        }
    }
}

/// Spawn helper для player персонажа
///
/// Создаёт две entity:
/// - персонаж (state компоненты + физика выбранного backend'а)
/// - follow target камеры (`CameraFollowTarget`, обновляется в PostUpdate)
///
/// Невалидный тюнинг → `ConfigError`, ничего не спавнится.
pub fn spawn_player_character(
    commands: &mut Commands,
    position: Vec3,
    facing_yaw: f32,
    config: ControllerConfig,
    backend: BodyBackend,
) -> Result<Entity, ConfigError> {
    if let Err(err) = config.validate() {
        logger::log_error(&format!("spawn_player_character: rejected config: {}", err));
        return Err(err);
    }

    let state = CharacterLocomotionState::new(&config).with_facing(facing_yaw);
    let orbit = CameraOrientationState::new(state.facing_yaw);
    let follow = Transform::from_translation(crate::camera::follow_point(position, &config.camera))
        .with_rotation(crate::camera::orbit_rotation(&orbit, &config.camera));

    let mut entity = commands.spawn((
        Transform::from_translation(position).with_rotation(math::heading_rotation(state.facing_yaw)),
        Player,
        InputSnapshot::default(),
        state,
        orbit,
        CombatState::default(),
        PhysicsBody::default(),
        GroundContact { grounded: true },
        AnimationParams {
            grounded: true,
            ..default()
        },
    ));

    if backend == BodyBackend::Rapier {
        entity.insert((
            RigidBody::KinematicPositionBased,
            // Капсула 1.8m: half height 0.62 + radius 0.28
            Collider::capsule_y(0.62, config.ground.grounded_radius),
            KinematicCharacterController::default(),
        ));
    }

    entity.insert(config);
    let owner = entity.id();

    commands.spawn((follow, CameraFollowTarget { owner }));

    logger::log_info(&format!("Spawned player {:?} at {:?} ({:?} backend)", owner, position, backend));
    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_ground_plane() {
        let ground = HeadlessGround { height: 1.0 };
        assert!(ground.is_grounded(Vec3::new(0.0, 1.2, 0.0), 0.28, u32::MAX));
        assert!(!ground.is_grounded(Vec3::new(0.0, 1.5, 0.0), 0.28, u32::MAX));
    }

    #[test]
    fn test_spawn_rejects_invalid_config() {
        let mut world = World::new();
        let mut config = ControllerConfig::default();
        config.combat.fire_interval = -1.0;

        let result = spawn_player_character(&mut world.commands(), Vec3::ZERO, 0.0, config, BodyBackend::Headless);
        world.flush();

        assert!(matches!(result, Err(ConfigError::NonPositiveFireInterval(_))));
        assert_eq!(world.query::<&Player>().iter(&world).count(), 0);
    }

    #[test]
    fn test_spawn_creates_follow_target() {
        let mut world = World::new();

        let player = spawn_player_character(
            &mut world.commands(),
            Vec3::new(2.0, 0.0, 0.0),
            90.0,
            ControllerConfig::default(),
            BodyBackend::Headless,
        )
        .unwrap();
        world.flush();

        let targets: Vec<_> = world
            .query::<(&CameraFollowTarget, &Transform)>()
            .iter(&world)
            .map(|(target, transform)| (target.owner, transform.translation))
            .collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0, player);
        assert!((targets[0].1.y - 1.375).abs() < 1e-5);

        let orbit = world.get::<CameraOrientationState>(player).unwrap();
        assert_eq!(orbit.yaw, 90.0);
        assert!(world.get::<KinematicCharacterController>(player).is_none());
    }
}
