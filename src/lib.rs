//! # bevy_grab_3d
//!
//! A Bevy plugin for first-person grabbing, carrying and throwing of
//! avian3d physics objects.
//!
//! ## Features
//!
//! - Per-frame targeting probe with a single consistent highlight
//! - Grab / drop / throw state machine with one hold session at a time
//! - Weight-aware carrying with smoothing and clipping avoidance
//! - Throws refused when a wall is right in front of the player
//! - Speed-based impact damage with cooldown
//! - Doors and other interactable fixtures
//!
//! ## Quick Start
//!
//! ```ignore
//! use avian3d::prelude::*;
//! use bevy::prelude::*;
//! use bevy_grab_3d::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PhysicsPlugins::default())
//!         .add_plugins(InteractionPlugin::default())
//!         .add_plugins(ImpactDamagePlugin)     // Optional: breakable payloads
//!         .add_plugins(DoorPlugin)             // Optional: interactable doors
//!         .add_plugins(FirstPersonCameraPlugin) // Optional: look and walk controls
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     // The camera is the player's eye
//!     commands.spawn((
//!         Camera3d::default(),
//!         Transform::from_xyz(0.0, 1.6, 5.0),
//!         FirstPersonCamera::default(),
//!         Grabber::default(),
//!     ));
//!
//!     // Something to pick up
//!     commands.spawn((
//!         RigidBody::Dynamic,
//!         Collider::cuboid(0.5, 0.5, 0.5),
//!         CollisionLayers::new(GrabLayer::Interactive, LayerMask::ALL),
//!         Grabbable::new(1.0),
//!         Transform::from_xyz(0.0, 0.25, 2.0),
//!     ));
//! }
//! ```
//!
//! ## Plugins
//!
//! - [`InteractionPlugin`]: Targeting, highlighting, grabbing, holding and throwing (required)
//! - [`ImpactDamagePlugin`]: Damage and destruction of fast-moving payloads (optional)
//! - [`DoorPlugin`]: Doors that swing when interacted with (optional)
//! - [`FirstPersonCameraPlugin`]: Mouse look and WASD walking (optional)
//!
//! ## Configuration
//!
//! [`InteractionPlugin::new`] validates a [`GrabConfig`] up front and refuses
//! to build from inconsistent limits:
//!
//! ```ignore
//! let config = GrabConfig::default()
//!     .with_hold_limits(1.5, 6.0)
//!     .with_hold_distance(3.0)
//!     .with_hold_mode(HoldMode::Kinematic);
//! app.add_plugins(InteractionPlugin::new(config)?);
//! ```

pub mod camera;
pub mod config;
pub mod container;
pub mod damage;
pub mod door;
pub mod grab;
pub mod hud;
pub mod physics;
pub mod targeting;

pub use camera::FirstPersonCameraPlugin;
pub use damage::ImpactDamagePlugin;
pub use door::DoorPlugin;
pub use grab::InteractionPlugin;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::camera::{FirstPersonCamera, FirstPersonCameraPlugin};
    pub use crate::config::{GrabConfig, GrabConfigError, HoldMode};
    pub use crate::container::{ContainerMessage, PayloadState};
    pub use crate::damage::{
        ImpactDamage, ImpactDamagePlugin, Integrity, PayloadDamaged, PayloadDestroyed,
    };
    pub use crate::door::{Door, DoorPlugin};
    pub use crate::grab::{
        GrabAction, GrabState, Grabber, HoldSession, InteractionPlugin, InteractionSystems,
        LiftDirection,
    };
    pub use crate::hud::{HoldStateChanged, InteractionHud, ReticleSettings, ReticleState};
    pub use crate::physics::{GrabLayer, HitInfo, PhysicsQuery, Viewpoint};
    pub use crate::targeting::{
        Capability, CurrentTarget, Grabbable, Highlight, Interactable, Interacted, ProbeHit,
    };

    #[cfg(feature = "keyboard")]
    pub use crate::grab::GrabKeyBindings;
}
