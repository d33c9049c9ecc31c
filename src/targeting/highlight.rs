use bevy::prelude::*;

use crate::hud::ReticleState;

use super::{set_highlighted, Capability, CurrentTarget, Highlight};

/// Keeps at most one entity highlighted.
///
/// Remembers the last highlighted entity per capability channel. Whenever the
/// target changes, every remembered entity that is not the new target is
/// switched off before the new target is switched on.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightArbiter {
    interactable: Option<Entity>,
    grabbable: Option<Entity>,
}

impl HighlightArbiter {
    /// The entity last highlighted on a channel.
    pub fn highlighted(&self, capability: Capability) -> Option<Entity> {
        match capability {
            Capability::Interactable => self.interactable,
            Capability::Grabbable => self.grabbable,
        }
    }

    fn channel_mut(&mut self, capability: Capability) -> &mut Option<Entity> {
        match capability {
            Capability::Interactable => &mut self.interactable,
            Capability::Grabbable => &mut self.grabbable,
        }
    }

    /// Apply this frame's target, calling `set_highlighted` for every change.
    pub fn update(
        &mut self,
        target: Option<(Entity, Capability)>,
        mut set_highlighted: impl FnMut(Entity, bool),
    ) {
        let current = target.map(|(entity, _)| entity);

        for channel in [&mut self.interactable, &mut self.grabbable] {
            if let Some(previous) = *channel {
                if Some(previous) != current {
                    set_highlighted(previous, false);
                    *channel = None;
                }
            }
        }

        if let Some((entity, capability)) = target {
            set_highlighted(entity, true);
            *self.channel_mut(capability) = Some(entity);
        }
    }
}

/// System that mirrors the probe result into highlight state and the reticle.
pub fn update_highlights(
    target: Res<CurrentTarget>,
    mut arbiter: ResMut<HighlightArbiter>,
    mut highlights: Query<&mut Highlight>,
    mut reticle: ResMut<ReticleState>,
) {
    arbiter.update(target.capability(), |entity, lit| {
        // Despawned entities simply drop out of the arbiter.
        if let Ok(mut highlight) = highlights.get_mut(entity) {
            set_highlighted(&mut highlight, lit);
        }
    });

    let state = if target.get().is_some() {
        ReticleState::Highlight
    } else {
        ReticleState::Default
    };
    reticle.set_if_neq(state);
}
