//! Receptacle bookkeeping for grabbable payloads.
//!
//! A payload is always in exactly one [`PayloadState`]. External receptacles
//! (a cart, a truck bed) report payloads entering and leaving through
//! [`ContainerMessage`]; stored payloads become kinematic and are exempt from
//! impact damage until they leave again.

use avian3d::prelude::*;
use bevy::prelude::*;

/// Where a grabbable payload currently is.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component, Default)]
pub enum PayloadState {
    /// Simulated freely by the physics world.
    #[default]
    Free,
    /// Motion is owned by the active hold session.
    Held,
    /// Resting inside a receptacle.
    InContainer,
}

impl PayloadState {
    pub fn is_in_container(&self) -> bool {
        *self == Self::InContainer
    }
}

/// Report from a receptacle about a payload crossing its boundary.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMessage {
    Entered(Entity),
    Exited(Entity),
}

/// System that applies receptacle reports to payload state.
///
/// Held payloads ignore receptacles: the hold session keeps authority until
/// the payload is dropped or thrown.
pub fn apply_container_messages(
    mut commands: Commands,
    mut messages: MessageReader<ContainerMessage>,
    mut payloads: Query<&mut PayloadState>,
) {
    for message in messages.read() {
        let (entity, entering) = match *message {
            ContainerMessage::Entered(entity) => (entity, true),
            ContainerMessage::Exited(entity) => (entity, false),
        };

        let Ok(mut state) = payloads.get_mut(entity) else {
            continue;
        };

        match (*state, entering) {
            (PayloadState::Free, true) => {
                *state = PayloadState::InContainer;
                commands
                    .entity(entity)
                    .insert((RigidBody::Kinematic, LinearVelocity::ZERO, AngularVelocity::ZERO));
                debug!("Payload {entity} stored in container");
            }
            (PayloadState::InContainer, false) => {
                *state = PayloadState::Free;
                commands.entity(entity).insert(RigidBody::Dynamic);
                debug!("Payload {entity} removed from container");
            }
            (PayloadState::Held, _) => {
                debug!("Ignoring container report for held payload {entity}");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_app() -> App {
        let mut app = App::new();
        app.add_message::<ContainerMessage>()
            .add_systems(Update, apply_container_messages);
        app
    }

    #[test]
    fn test_enter_and_exit_container() {
        let mut app = container_app();
        let payload = app
            .world_mut()
            .spawn((PayloadState::Free, RigidBody::Dynamic))
            .id();

        app.world_mut().write_message(ContainerMessage::Entered(payload));
        app.update();
        assert_eq!(
            app.world().get::<PayloadState>(payload),
            Some(&PayloadState::InContainer)
        );
        assert_eq!(
            app.world().get::<RigidBody>(payload),
            Some(&RigidBody::Kinematic)
        );

        app.world_mut().write_message(ContainerMessage::Exited(payload));
        app.update();
        assert_eq!(app.world().get::<PayloadState>(payload), Some(&PayloadState::Free));
        assert_eq!(app.world().get::<RigidBody>(payload), Some(&RigidBody::Dynamic));
    }

    #[test]
    fn test_held_payload_ignores_container() {
        let mut app = container_app();
        let payload = app
            .world_mut()
            .spawn((PayloadState::Held, RigidBody::Dynamic))
            .id();

        app.world_mut().write_message(ContainerMessage::Entered(payload));
        app.update();
        assert_eq!(app.world().get::<PayloadState>(payload), Some(&PayloadState::Held));
        assert_eq!(app.world().get::<RigidBody>(payload), Some(&RigidBody::Dynamic));
    }

    #[test]
    fn test_unknown_entity_is_ignored() {
        let mut app = container_app();
        let stray = app.world_mut().spawn_empty().id();
        app.world_mut().write_message(ContainerMessage::Entered(stray));
        app.update();
        assert!(app.world().get::<PayloadState>(stray).is_none());
    }
}
