//! Hinged doors: the stock [`Interactable`] fixture.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::grab::InteractionSystems;
use crate::targeting::{Interactable, Interacted};

/// A door that swings open and shut when interacted with.
///
/// The entity's transform is the hinge: its yaw is driven between
/// `closed_yaw` and `closed_yaw + open_angle`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
#[require(Interactable, Transform)]
pub struct Door {
    pub open: bool,
    /// Swing relative to the closed yaw, in radians. Negative opens the other way.
    pub open_angle: f32,
    /// Radians per second.
    pub swing_speed: f32,
    pub closed_yaw: f32,
    /// Current swing relative to `closed_yaw`.
    pub angle: f32,
}

impl Default for Door {
    fn default() -> Self {
        Self {
            open: false,
            open_angle: FRAC_PI_2,
            swing_speed: 2.0,
            closed_yaw: 0.0,
            angle: 0.0,
        }
    }
}

impl Door {
    pub fn new(closed_yaw: f32) -> Self {
        Self {
            closed_yaw,
            ..default()
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn target_angle(&self) -> f32 {
        if self.open {
            self.open_angle
        } else {
            0.0
        }
    }

    /// Move `angle` toward the target by at most `swing_speed * delta_secs`.
    pub fn step(&mut self, delta_secs: f32) {
        let target = self.target_angle();
        let max_step = self.swing_speed * delta_secs;
        if (target - self.angle).abs() <= max_step {
            self.angle = target;
        } else {
            self.angle += (target - self.angle).signum() * max_step;
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.closed_yaw + self.angle)
    }
}

/// System that toggles every door named by an [`Interacted`] message.
pub fn toggle_doors(mut interacted: MessageReader<Interacted>, mut doors: Query<&mut Door>) {
    for message in interacted.read() {
        if let Ok(mut door) = doors.get_mut(message.entity) {
            door.toggle();
            debug!(
                "Door {} {}",
                message.entity,
                if door.open { "opening" } else { "closing" }
            );
        }
    }
}

/// System that swings doors toward their open or closed angle.
pub fn swing_doors(time: Res<Time>, mut doors: Query<(&mut Door, &mut Transform)>) {
    let delta = time.delta_secs();
    for (mut door, mut transform) in &mut doors {
        if door.angle == door.target_angle() {
            continue;
        }
        door.step(delta);
        transform.rotation = door.rotation();
    }
}

/// Plugin that makes [`Door`] entities respond to interaction.
///
/// Requires [`InteractionPlugin`](crate::grab::InteractionPlugin), which
/// writes the [`Interacted`] messages.
pub struct DoorPlugin;

impl Plugin for DoorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Door>().add_systems(
            Update,
            (toggle_doors, swing_doors)
                .chain()
                .after(InteractionSystems::Actions),
        );
    }
}
