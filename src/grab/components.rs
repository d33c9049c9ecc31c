use avian3d::prelude::*;
use bevy::prelude::*;

use crate::config::GrabConfig;
use crate::targeting::Grabbable;

/// Marks the actor whose viewpoint drives targeting and holding.
///
/// Put it on the camera entity: its [`GlobalTransform`] supplies the eye
/// position and view direction. Only one grabber is supported at a time.
#[derive(Component, Debug, Default)]
pub struct Grabber {
    pub(crate) state: GrabState,
}

/// The grab state machine.
#[derive(Debug, Default)]
pub enum GrabState {
    #[default]
    Idle,
    Holding(HoldSession),
}

/// Rigid-body settings captured at grab time and restored on release.
#[derive(Debug, Clone, Copy)]
pub struct BodyRestore {
    pub gravity_scale: f32,
    pub locked_axes: LockedAxes,
    pub rigid_body: RigidBody,
}

impl Default for BodyRestore {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            locked_axes: LockedAxes::default(),
            rigid_body: RigidBody::Dynamic,
        }
    }
}

/// Motion authority over one payload for as long as it is held.
///
/// The session never owns the payload; if the payload is despawned the
/// session is discarded on the next frame.
#[derive(Debug, Clone, Copy)]
pub struct HoldSession {
    pub payload: Entity,
    /// Carry distance in front of the viewpoint.
    pub hold_distance: f32,
    /// Vertical offset: base height minus the weight term.
    pub height_offset: f32,
    /// Exponential approach rate.
    pub smoothing: f32,
    /// Accumulated lift/lower adjustment.
    pub lift_offset: f32,
    pub restore: BodyRestore,
}

impl HoldSession {
    pub fn new(
        payload: Entity,
        grabbable: &Grabbable,
        config: &GrabConfig,
        restore: BodyRestore,
    ) -> Self {
        Self {
            payload,
            hold_distance: config.hold_distance,
            height_offset: config.base_height_offset - grabbable.mass * config.weight_factor,
            smoothing: config.smoothing,
            lift_offset: 0.0,
            restore,
        }
    }
}

/// A request from the player's controls.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabAction {
    /// Interact with or pick up the current target.
    GrabOrInteract,
    /// Release the held payload.
    Drop,
    /// Throw the held payload along the view direction.
    Throw,
    /// `GrabOrInteract` while idle, `Drop` while holding.
    Toggle,
}

/// The current lift/lower input sample.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiftDirection {
    #[default]
    Steady,
    Up,
    Down,
}
