//! Input snapshot: состояние ввода на текущий frame

use bevy::prelude::*;

use crate::collaborators::InputProvider;

/// Снимок ввода игрока (polled или pushed хостом)
///
/// - `move_input`: WASD/stick, (x = right, y = forward)
/// - `look_input`: mouse delta или stick rate
/// - `fire`: уровень кнопки (edge detection делает CombatController)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct InputSnapshot {
    pub move_input: Vec2,
    pub look_input: Vec2,
    pub jump: bool,
    pub sprint: bool,
    pub fire: bool,
    /// Stick: скорость масштабируется длиной move_input
    pub analog: bool,
    /// Mouse: look delta уже frame-rate independent (multiplier 1.0 вместо dt)
    pub pointer_look: bool,
}

impl InputSnapshot {
    /// Снимает состояние с любого InputProvider
    pub fn poll(provider: &dyn InputProvider) -> Self {
        Self {
            move_input: provider.move_input(),
            look_input: provider.look_input(),
            jump: provider.is_jumping(),
            sprint: provider.is_sprinting(),
            fire: provider.is_firing(),
            analog: provider.is_analog(),
            pointer_look: provider.is_pointer_look(),
        }
    }

    /// Длина move input для MotionSpeed (1.0 для цифрового ввода)
    pub fn input_magnitude(&self) -> f32 {
        if self.analog {
            self.move_input.length()
        } else {
            1.0
        }
    }

    pub fn has_move_input(&self) -> bool {
        self.move_input != Vec2::ZERO
    }
}

impl InputProvider for InputSnapshot {
    fn move_input(&self) -> Vec2 {
        self.move_input
    }

    fn look_input(&self) -> Vec2 {
        self.look_input
    }

    fn is_jumping(&self) -> bool {
        self.jump
    }

    fn is_sprinting(&self) -> bool {
        self.sprint
    }

    fn is_firing(&self) -> bool {
        self.fire
    }

    fn is_analog(&self) -> bool {
        self.analog
    }

    fn is_pointer_look(&self) -> bool {
        self.pointer_look
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_magnitude_digital_vs_analog() {
        let mut input = InputSnapshot {
            move_input: Vec2::new(0.3, 0.4),
            ..default()
        };
        assert_eq!(input.input_magnitude(), 1.0);

        input.analog = true;
        assert!((input.input_magnitude() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_poll_round_trips_provider() {
        let source = InputSnapshot {
            move_input: Vec2::Y,
            look_input: Vec2::new(2.0, -1.0),
            jump: true,
            fire: true,
            pointer_look: true,
            ..default()
        };
        assert_eq!(InputSnapshot::poll(&source), source);
    }
}
