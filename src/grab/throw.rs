//! Throw controller.

use bevy::prelude::*;

use crate::config::GrabConfig;
use crate::physics::{PhysicsQuery, Viewpoint};

/// Whether a throw may go ahead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrowVerdict {
    Thrown { impulse: Vec3 },
    /// Solid geometry within the minimum hold distance straight ahead.
    Refused,
}

/// Decide whether the held payload can be thrown from `viewpoint`.
pub fn evaluate_throw<P: PhysicsQuery>(
    physics: &P,
    viewpoint: &Viewpoint,
    config: &GrabConfig,
    excluded: &[Entity],
) -> ThrowVerdict {
    let blocked = physics
        .ray_cast(
            viewpoint.position,
            viewpoint.forward,
            config.min_hold_distance,
            config.solid_layers,
            excluded,
        )
        .is_some();

    if blocked {
        ThrowVerdict::Refused
    } else {
        ThrowVerdict::Thrown {
            impulse: *viewpoint.forward * config.throw_force,
        }
    }
}

/// Linear velocity after an instantaneous impulse on a body of `mass`.
pub fn velocity_after_impulse(velocity: Vec3, impulse: Vec3, mass: f32) -> Vec3 {
    if mass > f32::EPSILON {
        velocity + impulse / mass
    } else {
        velocity + impulse
    }
}
