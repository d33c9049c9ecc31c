//! Grab state machine: Idle <-> Holding.

use bevy::prelude::*;

use crate::targeting::{Capability, ProbeHit};

use super::throw::ThrowVerdict;
use super::{GrabState, Grabber, HoldSession};

/// Result of [`Grabber::request_grab_or_interact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOutcome {
    /// An interactable was triggered; the state stays Idle.
    Interacted(Entity),
    /// A hold session started.
    Grabbed(Entity),
    /// Nothing usable under the crosshair.
    NoTarget,
    /// Already holding; a second session is never opened.
    Busy,
}

/// Result of [`Grabber::request_throw`].
#[derive(Debug, Clone, Copy)]
pub enum ThrowOutcome {
    NotHolding,
    /// Something solid is right in front of the actor; still holding.
    Refused,
    Thrown { session: HoldSession, impulse: Vec3 },
}

impl Grabber {
    pub fn state(&self) -> &GrabState {
        &self.state
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, GrabState::Holding(_))
    }

    pub fn session(&self) -> Option<&HoldSession> {
        match &self.state {
            GrabState::Holding(session) => Some(session),
            GrabState::Idle => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut HoldSession> {
        match &mut self.state {
            GrabState::Holding(session) => Some(session),
            GrabState::Idle => None,
        }
    }

    /// The held payload, if any.
    pub fn held(&self) -> Option<Entity> {
        self.session().map(|session| session.payload)
    }

    /// Interact with or grab the probe's target.
    ///
    /// `start_session` builds the session for a grabbable target; returning
    /// `None` (e.g. the entity has no rigid body) leaves the grabber idle.
    pub fn request_grab_or_interact(
        &mut self,
        target: Option<&ProbeHit>,
        start_session: impl FnOnce(Entity) -> Option<HoldSession>,
    ) -> GrabOutcome {
        if self.is_holding() {
            return GrabOutcome::Busy;
        }

        let Some(target) = target else {
            return GrabOutcome::NoTarget;
        };

        match target.capability {
            Capability::Interactable => GrabOutcome::Interacted(target.entity),
            Capability::Grabbable => match start_session(target.entity) {
                Some(session) => {
                    self.state = GrabState::Holding(session);
                    GrabOutcome::Grabbed(session.payload)
                }
                None => GrabOutcome::NoTarget,
            },
        }
    }

    /// End the session and hand the payload back to the physics world.
    pub fn request_drop(&mut self) -> Option<HoldSession> {
        match std::mem::take(&mut self.state) {
            GrabState::Holding(session) => Some(session),
            GrabState::Idle => None,
        }
    }

    /// Ask the throw controller; the session ends only if the throw goes ahead.
    pub fn request_throw(
        &mut self,
        evaluate: impl FnOnce(&HoldSession) -> ThrowVerdict,
    ) -> ThrowOutcome {
        let Some(session) = self.session() else {
            return ThrowOutcome::NotHolding;
        };

        match evaluate(session) {
            ThrowVerdict::Refused => ThrowOutcome::Refused,
            ThrowVerdict::Thrown { impulse } => {
                let session = *session;
                self.state = GrabState::Idle;
                ThrowOutcome::Thrown { session, impulse }
            }
        }
    }

    /// Drop a session whose payload no longer exists.
    pub fn release_if_stale(&mut self, exists: impl Fn(Entity) -> bool) -> Option<HoldSession> {
        let payload = self.held()?;
        if exists(payload) {
            return None;
        }
        self.request_drop()
    }
}
