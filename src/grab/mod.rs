//! Grab state machine, hold controller and throw controller.
//!
//! # Example
//!
//! ```rust,ignore
//! use avian3d::prelude::*;
//! use bevy::prelude::*;
//! use bevy_grab_3d::prelude::*;
//!
//! fn setup(mut commands: Commands) {
//!     // The camera is the grabber: its transform is the eye.
//!     commands.spawn((Camera3d::default(), Grabber::default()));
//!
//!     // A crate that can be picked up.
//!     commands.spawn((
//!         RigidBody::Dynamic,
//!         Collider::cuboid(0.5, 0.5, 0.5),
//!         CollisionLayers::new(GrabLayer::Interactive, LayerMask::ALL),
//!         Grabbable::new(2.0),
//!         Transform::from_xyz(0.0, 0.5, -3.0),
//!     ));
//! }
//! ```

mod components;
mod hold;
#[cfg(feature = "keyboard")]
mod input;
mod state;
mod systems;
mod throw;

pub use components::*;
pub use hold::{
    clamp_min_distance, desired_hold_position, hold_velocity, resolve_hold_target,
    smoothing_step, step_lift_offset, HoldTarget, CLIP_MARGIN,
};
#[cfg(feature = "keyboard")]
pub use input::{read_grab_keys, GrabKeyBindings};
pub use state::{GrabOutcome, ThrowOutcome};
pub use systems::{
    apply_grab_actions, drive_held_payload, handle_grab_actions, release_stale_session,
    sync_payload_mass, update_held_payload, GrabActionContext, HeldPayloadContext,
};
pub use throw::{evaluate_throw, velocity_after_impulse, ThrowVerdict};

use bevy::prelude::*;

use crate::config::{GrabConfig, GrabConfigError, HoldMode};
use crate::container::{apply_container_messages, ContainerMessage, PayloadState};
use crate::hud::{
    sync_interaction_hud, HoldStateChanged, InteractionHud, ReticleSettings, ReticleState,
};
use crate::targeting::{
    probe_targets, update_highlights, CurrentTarget, Grabbable, Highlight, HighlightArbiter,
    Interactable, Interacted,
};

/// Per-frame ordering of the interaction pipeline, all in [`Update`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionSystems {
    /// Player input becomes [`GrabAction`] messages.
    Input,
    /// Payload masses, stale sessions and container transitions are settled.
    Validate,
    /// The targeting ray is cast.
    Probe,
    /// Highlight and reticle follow the probe result.
    Highlight,
    /// Grab, drop and throw requests are applied.
    Actions,
    /// The held payload is moved and the HUD catches up.
    Hold,
}

/// Plugin that wires targeting, highlighting, grabbing, holding and throwing.
///
/// Requires avian's `PhysicsPlugins`. Construct it from a validated
/// [`GrabConfig`]:
///
/// ```ignore
/// let plugin = InteractionPlugin::new(GrabConfig::default().with_throw_force(14.0))?;
/// app.add_plugins(plugin);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InteractionPlugin {
    config: GrabConfig,
}

impl InteractionPlugin {
    /// Validate `config` and build the plugin around it.
    pub fn new(config: GrabConfig) -> Result<Self, GrabConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GrabConfig {
        &self.config
    }
}

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GrabConfig>()
            .register_type::<HoldMode>()
            .register_type::<Interactable>()
            .register_type::<Grabbable>()
            .register_type::<Highlight>()
            .register_type::<PayloadState>()
            .insert_resource(self.config.clone())
            .init_resource::<CurrentTarget>()
            .init_resource::<HighlightArbiter>()
            .init_resource::<ReticleState>()
            .init_resource::<ReticleSettings>()
            .init_resource::<InteractionHud>()
            .init_resource::<LiftDirection>()
            .add_message::<GrabAction>()
            .add_message::<Interacted>()
            .add_message::<HoldStateChanged>()
            .add_message::<ContainerMessage>()
            .configure_sets(
                Update,
                (
                    InteractionSystems::Input,
                    InteractionSystems::Validate,
                    InteractionSystems::Probe,
                    InteractionSystems::Highlight,
                    InteractionSystems::Actions,
                    InteractionSystems::Hold,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    (
                        sync_payload_mass,
                        release_stale_session,
                        apply_container_messages,
                    )
                        .in_set(InteractionSystems::Validate),
                    probe_targets.in_set(InteractionSystems::Probe),
                    update_highlights.in_set(InteractionSystems::Highlight),
                    handle_grab_actions.in_set(InteractionSystems::Actions),
                    (update_held_payload, sync_interaction_hud).in_set(InteractionSystems::Hold),
                ),
            );

        #[cfg(feature = "keyboard")]
        app.init_resource::<GrabKeyBindings>().add_systems(
            Update,
            read_grab_keys
                .in_set(InteractionSystems::Input)
                .run_if(
                    resource_exists::<ButtonInput<KeyCode>>
                        .and(resource_exists::<ButtonInput<MouseButton>>),
                ),
        );
    }
}
