mod first_person;

pub use first_person::{first_person_camera_input, FirstPersonCamera};

use bevy::prelude::*;

/// Plugin that adds first-person camera controls.
///
/// Add a [`FirstPersonCamera`] component to your camera entity.
///
/// # Controls
/// - Right mouse button + drag: Look around
/// - WASD: Walk on the ground plane
pub struct FirstPersonCameraPlugin;

impl Plugin for FirstPersonCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FirstPersonCamera>().add_systems(
            Update,
            first_person_camera_input.run_if(
                resource_exists::<ButtonInput<KeyCode>>
                    .and(resource_exists::<ButtonInput<MouseButton>>),
            ),
        );
    }
}
