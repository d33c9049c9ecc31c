//! Targeting probe and highlight arbitration.
//!
//! Every frame a single ray is cast from the actor's viewpoint along the
//! interactive layer. The nearest hit is classified as [`Interactable`] or
//! [`Grabbable`] and stored in [`CurrentTarget`]; the [`HighlightArbiter`]
//! then makes sure exactly that entity, and no other, is highlighted.

mod components;
mod highlight;
mod probe;

pub use components::*;
pub use highlight::{update_highlights, HighlightArbiter};
pub use probe::{acquire_target, capability_of, probe_targets, refresh_target, TargetingContext};
