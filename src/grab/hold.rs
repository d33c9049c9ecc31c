//! Hold controller: where a carried payload should be this frame.
//!
//! The target is computed in two stages every frame. First the desired
//! position in front of the eye (weight-adjusted, floored at the minimum hold
//! distance), then a line cast from the eye toward it: if solid geometry is in
//! the way, the payload is pulled back in front of the obstruction.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::config::{GrabConfig, HoldMode};
use crate::physics::{PhysicsQuery, Viewpoint};

use super::{HoldSession, LiftDirection};

/// How far in front of an obstruction a held payload is placed.
pub const CLIP_MARGIN: f32 = 0.2;

/// The obstruction-corrected hold position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldTarget {
    pub position: Vec3,
    /// Whether geometry between the eye and the desired position moved it.
    pub obstructed: bool,
}

/// Move `position` out to `min_distance` along the view ray if it is closer.
pub fn clamp_min_distance(viewpoint: &Viewpoint, position: Vec3, min_distance: f32) -> Vec3 {
    if position.distance(viewpoint.position) < min_distance {
        viewpoint.point_at(min_distance)
    } else {
        position
    }
}

/// Desired hold position before obstruction checks.
pub fn desired_hold_position(
    viewpoint: &Viewpoint,
    session: &HoldSession,
    min_distance: f32,
) -> Vec3 {
    let mut desired = viewpoint.point_at(session.hold_distance);
    desired.y += session.height_offset + session.lift_offset;
    clamp_min_distance(viewpoint, desired, min_distance)
}

/// Pull the desired position in front of any solid geometry on the way.
pub fn resolve_hold_target<P: PhysicsQuery>(
    physics: &P,
    viewpoint: &Viewpoint,
    desired: Vec3,
    min_distance: f32,
    solid_layers: LayerMask,
    excluded: &[Entity],
) -> HoldTarget {
    match physics.line_cast(viewpoint.position, desired, solid_layers, excluded) {
        Some(hit) => {
            let pulled_back = hit.point - *viewpoint.forward * CLIP_MARGIN;
            HoldTarget {
                position: clamp_min_distance(viewpoint, pulled_back, min_distance),
                obstructed: true,
            }
        }
        None => HoldTarget {
            position: desired,
            obstructed: false,
        },
    }
}

/// One frame of exponential approach from `current` toward `target`.
pub fn smoothing_step(current: Vec3, target: Vec3, smoothing: f32, delta_secs: f32) -> Vec3 {
    let alpha = 1.0 - (-smoothing * delta_secs).exp();
    current.lerp(target, alpha.clamp(0.0, 1.0))
}

/// Velocity that carries a payload from `current` toward this frame's hold
/// position, or `None` when the payload has to be placed on the target.
///
/// Kinematic payloads cover the whole gap in one frame; physics payloads
/// approach it through [`smoothing_step`]. Obstructed targets are never
/// steered into, since the body would push against the geometry.
pub fn hold_velocity(
    current: Vec3,
    target: &HoldTarget,
    mode: HoldMode,
    smoothing: f32,
    delta_secs: f32,
) -> Option<Vec3> {
    if target.obstructed || delta_secs <= 0.0 {
        return None;
    }
    let next = match mode {
        HoldMode::Physics => smoothing_step(current, target.position, smoothing, delta_secs),
        HoldMode::Kinematic => target.position,
    };
    Some((next - current) / delta_secs)
}

/// Advance the lift offset for one frame of input.
pub fn step_lift_offset(
    offset: f32,
    direction: LiftDirection,
    config: &GrabConfig,
    delta_secs: f32,
) -> f32 {
    let delta = match direction {
        LiftDirection::Steady => return offset,
        LiftDirection::Up => config.lift_speed * delta_secs,
        LiftDirection::Down => -config.lower_speed * delta_secs,
    };
    (offset + delta).clamp(-config.max_lift_offset, config.max_lift_offset)
}
