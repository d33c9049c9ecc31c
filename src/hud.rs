//! Presentation signals produced by the interaction subsystem.
//!
//! Nothing here feeds back into targeting or holding. UI code reads
//! [`InteractionHud`] and [`ReticleState`] (or listens to [`HoldStateChanged`])
//! to relabel buttons and recolor the crosshair.

use bevy::prelude::*;

/// Crosshair state derived from the probe result.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReticleState {
    /// Nothing usable under the crosshair.
    #[default]
    Default,
    /// The crosshair rests on an interactable or grabbable entity.
    Highlight,
}

impl ReticleState {
    pub fn color(&self, settings: &ReticleSettings) -> Color {
        match self {
            Self::Default => settings.default_color,
            Self::Highlight => settings.highlight_color,
        }
    }
}

/// Crosshair colors.
#[derive(Resource, Debug, Clone)]
pub struct ReticleSettings {
    pub default_color: Color,
    pub highlight_color: Color,
}

impl Default for ReticleSettings {
    fn default() -> Self {
        Self {
            default_color: Color::WHITE,
            highlight_color: Color::srgb(0.0, 1.0, 0.0),
        }
    }
}

/// Written whenever a hold session starts or ends.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldStateChanged {
    pub holding: bool,
    /// The payload picked up, or the one just released.
    pub payload: Option<Entity>,
}

/// Whether the actor currently holds something.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionHud {
    pub holding: bool,
}

impl InteractionHud {
    /// Label for the combined grab/drop button.
    pub fn grab_label(&self) -> &'static str {
        if self.holding {
            "Drop"
        } else {
            "Grab"
        }
    }

    /// Throwing is only offered while holding.
    pub fn throw_available(&self) -> bool {
        self.holding
    }
}

/// System that folds hold notifications into [`InteractionHud`].
pub fn sync_interaction_hud(
    mut changes: MessageReader<HoldStateChanged>,
    mut hud: ResMut<InteractionHud>,
) {
    if let Some(last) = changes.read().last() {
        hud.set_if_neq(InteractionHud {
            holding: last.holding,
        });
    }
}
