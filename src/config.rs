//! Tuning values for targeting, holding and throwing.

use avian3d::prelude::*;
use bevy::prelude::*;
use thiserror::Error;

use crate::physics::{solid_mask, GrabLayer};

/// How a held payload is moved while it is carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum HoldMode {
    /// Keep the body dynamic: gravity is suspended, rotation is locked and the
    /// payload is steered through its linear velocity.
    #[default]
    Physics,
    /// Switch the body to kinematic and give it the velocity that reaches the
    /// hold position within one frame.
    Kinematic,
}

/// Configuration of the interaction subsystem.
///
/// Build one with [`GrabConfig::default`] and the `with_*` methods, then hand it
/// to [`InteractionPlugin::new`](crate::InteractionPlugin::new), which rejects
/// inconsistent values before anything is scheduled.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct GrabConfig {
    /// Maximum distance of the targeting probe.
    pub pickup_range: f32,
    /// Closest a held payload may come to the viewpoint.
    pub min_hold_distance: f32,
    /// Upper bound for `hold_distance`.
    pub max_hold_distance: f32,
    /// Distance in front of the viewpoint at which payloads are carried.
    pub hold_distance: f32,
    /// Impulse magnitude applied along the view direction on throw.
    pub throw_force: f32,
    /// Exponential approach rate toward the hold position (per second).
    pub smoothing: f32,
    /// How strongly payload mass lowers the hold position.
    pub weight_factor: f32,
    /// Vertical offset added to the hold position before the weight term.
    pub base_height_offset: f32,
    /// Physics-driven or kinematic holding.
    pub hold_mode: HoldMode,
    /// Lift rate while the lift input is held (units per second).
    pub lift_speed: f32,
    /// Lower rate while the lower input is held (units per second).
    pub lower_speed: f32,
    /// Largest accumulated lift/lower offset in either direction.
    pub max_lift_offset: f32,
    /// Layers the probe can target.
    #[reflect(ignore, default = "default_interactive_layers")]
    pub interactive_layers: LayerMask,
    /// Layers that block held payloads and throws.
    #[reflect(ignore, default = "default_solid_layers")]
    pub solid_layers: LayerMask,
}

fn default_interactive_layers() -> LayerMask {
    GrabConfig::default().interactive_layers
}

fn default_solid_layers() -> LayerMask {
    GrabConfig::default().solid_layers
}

impl Default for GrabConfig {
    fn default() -> Self {
        let interactive = LayerMask::from(GrabLayer::Interactive);
        Self {
            pickup_range: 3.0,
            min_hold_distance: 2.0,
            max_hold_distance: 7.0,
            hold_distance: 5.0,
            throw_force: 10.0,
            smoothing: 10.0,
            weight_factor: 0.1,
            base_height_offset: 0.5,
            hold_mode: HoldMode::Physics,
            lift_speed: 1.0,
            lower_speed: 1.0,
            max_lift_offset: 1.5,
            interactive_layers: interactive,
            solid_layers: solid_mask(interactive, GrabLayer::Actor.into()),
        }
    }
}

impl GrabConfig {
    /// Set the probe range.
    pub fn with_pickup_range(mut self, range: f32) -> Self {
        self.pickup_range = range;
        self
    }

    /// Set the minimum and maximum hold distances.
    pub fn with_hold_limits(mut self, min: f32, max: f32) -> Self {
        self.min_hold_distance = min;
        self.max_hold_distance = max;
        self
    }

    /// Set the carry distance.
    pub fn with_hold_distance(mut self, distance: f32) -> Self {
        self.hold_distance = distance;
        self
    }

    /// Set the throw impulse.
    pub fn with_throw_force(mut self, force: f32) -> Self {
        self.throw_force = force;
        self
    }

    /// Set the smoothing rate.
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the weight factor and the base height offset.
    pub fn with_weight(mut self, weight_factor: f32, base_height_offset: f32) -> Self {
        self.weight_factor = weight_factor;
        self.base_height_offset = base_height_offset;
        self
    }

    /// Choose physics-driven or kinematic holding.
    pub fn with_hold_mode(mut self, mode: HoldMode) -> Self {
        self.hold_mode = mode;
        self
    }

    /// Set lift/lower rates and the offset limit.
    pub fn with_lift(mut self, lift_speed: f32, lower_speed: f32, max_offset: f32) -> Self {
        self.lift_speed = lift_speed;
        self.lower_speed = lower_speed;
        self.max_lift_offset = max_offset;
        self
    }

    /// Set the interactive and solid layer masks.
    pub fn with_layers(mut self, interactive: LayerMask, solid: LayerMask) -> Self {
        self.interactive_layers = interactive;
        self.solid_layers = solid;
        self
    }

    /// Check the configuration for values the subsystem cannot run with.
    pub fn validate(&self) -> Result<(), GrabConfigError> {
        let positive = [
            ("pickup_range", self.pickup_range),
            ("min_hold_distance", self.min_hold_distance),
            ("max_hold_distance", self.max_hold_distance),
            ("hold_distance", self.hold_distance),
            ("throw_force", self.throw_force),
            ("smoothing", self.smoothing),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GrabConfigError::NotPositive { name, value });
            }
        }

        let non_negative = [
            ("weight_factor", self.weight_factor),
            ("lift_speed", self.lift_speed),
            ("lower_speed", self.lower_speed),
            ("max_lift_offset", self.max_lift_offset),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(GrabConfigError::Negative { name, value });
            }
        }

        if !self.base_height_offset.is_finite() {
            return Err(GrabConfigError::NotFinite {
                name: "base_height_offset",
                value: self.base_height_offset,
            });
        }

        if self.min_hold_distance > self.max_hold_distance {
            return Err(GrabConfigError::InvertedHoldLimits {
                min: self.min_hold_distance,
                max: self.max_hold_distance,
            });
        }

        if self.hold_distance < self.min_hold_distance
            || self.hold_distance > self.max_hold_distance
        {
            return Err(GrabConfigError::HoldDistanceOutOfRange {
                distance: self.hold_distance,
                min: self.min_hold_distance,
                max: self.max_hold_distance,
            });
        }

        if self.interactive_layers.0 == 0 {
            return Err(GrabConfigError::EmptyInteractiveLayers);
        }

        if self.interactive_layers.0 & self.solid_layers.0 != 0 {
            return Err(GrabConfigError::OverlappingLayers {
                interactive: self.interactive_layers.0,
                solid: self.solid_layers.0,
            });
        }

        Ok(())
    }
}

/// Reasons a [`GrabConfig`] is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrabConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("minimum hold distance {min} exceeds maximum hold distance {max}")]
    InvertedHoldLimits { min: f32, max: f32 },

    #[error("hold distance {distance} is outside [{min}, {max}]")]
    HoldDistanceOutOfRange { distance: f32, min: f32, max: f32 },

    #[error("interactive layer mask is empty, nothing could ever be targeted")]
    EmptyInteractiveLayers,

    #[error("interactive layers {interactive:#b} overlap solid layers {solid:#b}")]
    OverlappingLayers { interactive: u32, solid: u32 },
}
