//! Impact damage for grabbable payloads.
//!
//! Add [`ImpactDamage`] to a [`Grabbable`](crate::targeting::Grabbable) entity
//! to make it breakable. Each frame its speed is compared against a threshold;
//! fast enough payloads lose `ceil(mass × speed × 0.1)` integrity, at most once
//! per cooldown, and are despawned when nothing is left.
//!
//! ```rust,ignore
//! commands.spawn((
//!     RigidBody::Dynamic,
//!     Collider::cuboid(0.3, 0.3, 0.3),
//!     Grabbable::new(1.5),
//!     ImpactDamage::new(8.0, 0.25),
//!     Integrity::new(20),
//! ));
//! ```

mod components;
mod systems;

pub use components::*;
pub use systems::evaluate_impact_damage;

use bevy::prelude::*;

use crate::grab::InteractionSystems;

/// Plugin that evaluates impact damage after the interaction pipeline.
pub struct ImpactDamagePlugin;

impl Plugin for ImpactDamagePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ImpactDamage>()
            .register_type::<Integrity>()
            .add_message::<PayloadDamaged>()
            .add_message::<PayloadDestroyed>()
            .add_systems(
                Update,
                evaluate_impact_damage.after(InteractionSystems::Hold),
            );
    }
}
