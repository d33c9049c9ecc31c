use bevy::prelude::*;

use crate::container::PayloadState;

/// A fixture that reacts to the interact action (doors, switches).
///
/// Interacting never grabs the entity; it writes an [`Interacted`] message that
/// fixture systems such as [`Door`](crate::door::Door) consume.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component, Default)]
#[require(Highlight)]
pub struct Interactable;

/// A physical payload that can be picked up, carried and thrown.
///
/// The entity is expected to be an avian3d dynamic rigid body on the
/// [`GrabLayer::Interactive`](crate::physics::GrabLayer::Interactive) layer.
/// Its mass is the body's mass: [`sync_payload_mass`](crate::grab::sync_payload_mass)
/// writes it into avian's `Mass` and turns off the collider-derived mass.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
#[require(Highlight, PayloadState)]
pub struct Grabbable {
    /// Body mass, also used for the hold height, throw velocity and impact damage.
    pub mass: f32,
}

impl Default for Grabbable {
    fn default() -> Self {
        Self { mass: 1.0 }
    }
}

impl Grabbable {
    pub fn new(mass: f32) -> Self {
        Self { mass }
    }
}

/// Whether an entity is currently outlined as the probe's target.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component, Default)]
pub struct Highlight {
    pub lit: bool,
}

impl Highlight {
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

/// Set the highlight state, touching the component only when it changes.
///
/// Returns `true` if the state was changed.
pub fn set_highlighted(highlight: &mut Mut<Highlight>, lit: bool) -> bool {
    highlight.set_if_neq(Highlight { lit })
}

/// What the probe can do with a hit entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Capability {
    Interactable,
    Grabbable,
}

/// Classified result of one targeting probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Entity carrying the capability (the rigid body for compound colliders).
    pub entity: Entity,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the viewpoint.
    pub distance: f32,
    pub capability: Capability,
}

/// The probe result for the current frame.
///
/// Written once per frame by [`probe_targets`](super::probe_targets) and read
/// by every downstream consumer, so highlighting and grabbing always agree.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrentTarget(pub Option<ProbeHit>);

impl CurrentTarget {
    pub fn get(&self) -> Option<&ProbeHit> {
        self.0.as_ref()
    }

    pub fn entity(&self) -> Option<Entity> {
        self.0.map(|hit| hit.entity)
    }

    pub fn capability(&self) -> Option<(Entity, Capability)> {
        self.0.map(|hit| (hit.entity, hit.capability))
    }
}

/// Written when the actor interacts with an [`Interactable`].
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interacted {
    pub entity: Entity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_highlighted_is_idempotent() {
        let mut world = World::new();
        let entity = world.spawn(Highlight::default()).id();
        let mut highlight = world.get_mut::<Highlight>(entity).unwrap();

        assert!(!set_highlighted(&mut highlight, false));
        assert!(set_highlighted(&mut highlight, true));
        assert!(!set_highlighted(&mut highlight, true));
        assert!(highlight.is_lit());
    }

    #[test]
    fn test_grabbable_requires_highlight_and_state() {
        let mut world = World::new();
        let entity = world.spawn(Grabbable::new(2.0)).id();
        assert!(world.get::<Highlight>(entity).is_some());
        assert_eq!(world.get::<PayloadState>(entity), Some(&PayloadState::Free));
    }
}
