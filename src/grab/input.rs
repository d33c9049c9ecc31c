use bevy::prelude::*;

use super::{GrabAction, LiftDirection};

/// Keyboard and mouse bindings for the grab controls.
#[derive(Resource, Debug, Clone)]
pub struct GrabKeyBindings {
    /// Grab or interact while idle, drop while holding.
    pub toggle: KeyCode,
    pub throw: MouseButton,
    pub lift: KeyCode,
    pub lower: KeyCode,
}

impl Default for GrabKeyBindings {
    fn default() -> Self {
        Self {
            toggle: KeyCode::KeyE,
            throw: MouseButton::Left,
            lift: KeyCode::KeyR,
            lower: KeyCode::KeyF,
        }
    }
}

/// System that turns key presses into [`GrabAction`] messages and samples lift input.
pub fn read_grab_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<GrabKeyBindings>,
    mut actions: MessageWriter<GrabAction>,
    mut lift: ResMut<LiftDirection>,
) {
    if keyboard.just_pressed(bindings.toggle) {
        actions.write(GrabAction::Toggle);
    }
    if mouse.just_pressed(bindings.throw) {
        actions.write(GrabAction::Throw);
    }

    // Holding both cancels out.
    let direction = match (
        keyboard.pressed(bindings.lift),
        keyboard.pressed(bindings.lower),
    ) {
        (true, false) => LiftDirection::Up,
        (false, true) => LiftDirection::Down,
        _ => LiftDirection::Steady,
    };
    lift.set_if_neq(direction);
}
