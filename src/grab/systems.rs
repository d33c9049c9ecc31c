use avian3d::prelude::*;
use bevy::{ecs::system::SystemParam, prelude::*};

use crate::config::{GrabConfig, HoldMode};
use crate::container::PayloadState;
use crate::hud::HoldStateChanged;
use crate::physics::{cast_exclusions, AvianPhysics, PhysicsQuery, Viewpoint};
use crate::targeting::{CurrentTarget, Grabbable, Interacted};

use super::hold::{desired_hold_position, hold_velocity, resolve_hold_target, step_lift_offset};
use super::state::{GrabOutcome, ThrowOutcome};
use super::throw::{evaluate_throw, velocity_after_impulse};
use super::{BodyRestore, GrabAction, Grabber, HoldSession, LiftDirection};

/// Components read from a payload when a session starts or ends.
type PayloadBody<'a> = (
    &'a Grabbable,
    &'a mut PayloadState,
    &'a LinearVelocity,
    Option<&'a RigidBody>,
    Option<&'a GravityScale>,
    Option<&'a LockedAxes>,
);

/// System that makes [`Grabbable::mass`] the body's mass.
///
/// Avian would otherwise derive the mass from collider volume, and the throw
/// and damage maths would disagree with the simulated body.
pub fn sync_payload_mass(
    mut commands: Commands,
    payloads: Query<(Entity, &Grabbable), Changed<Grabbable>>,
) {
    for (entity, grabbable) in &payloads {
        commands
            .entity(entity)
            .insert((Mass(grabbable.mass), NoAutoMass));
    }
}

/// System that ends hold sessions whose payload was despawned.
pub fn release_stale_session(
    mut grabbers: Query<&mut Grabber>,
    payloads: Query<(), With<Grabbable>>,
    mut hold_changes: MessageWriter<HoldStateChanged>,
) {
    for mut grabber in &mut grabbers {
        let Some(payload) = grabber.held() else {
            continue;
        };
        if payloads.contains(payload) {
            continue;
        }

        if grabber.release_if_stale(|entity| payloads.contains(entity)).is_some() {
            warn!("Held payload {payload} no longer exists, releasing hold");
            hold_changes.write(HoldStateChanged {
                holding: false,
                payload: Some(payload),
            });
        }
    }
}

/// Everything [`handle_grab_actions`] touches besides the physics world.
#[derive(SystemParam)]
pub struct GrabActionContext<'w, 's> {
    commands: Commands<'w, 's>,
    config: Res<'w, GrabConfig>,
    target: Res<'w, CurrentTarget>,
    actions: MessageReader<'w, 's, GrabAction>,
    grabbers: Query<'w, 's, (Entity, &'static mut Grabber, &'static GlobalTransform)>,
    payloads: Query<'w, 's, PayloadBody<'static>>,
    colliders: Query<'w, 's, (Entity, &'static ColliderOf)>,
    interacted: MessageWriter<'w, Interacted>,
    hold_changes: MessageWriter<'w, HoldStateChanged>,
}

/// System that applies grab, drop and throw requests.
pub fn handle_grab_actions(spatial_query: SpatialQuery, context: GrabActionContext) {
    apply_grab_actions(&AvianPhysics::new(&spatial_query), context);
}

/// Apply this frame's [`GrabAction`]s, checking throws against `physics`.
pub fn apply_grab_actions<P: PhysicsQuery>(physics: &P, context: GrabActionContext) {
    let GrabActionContext {
        mut commands,
        config,
        target,
        mut actions,
        mut grabbers,
        mut payloads,
        colliders,
        mut interacted,
        mut hold_changes,
    } = context;

    let Ok((actor, mut grabber, eye)) = grabbers.single_mut() else {
        actions.clear();
        return;
    };
    let viewpoint = Viewpoint::from_global_transform(eye);

    for action in actions.read() {
        match (*action, grabber.is_holding()) {
            (GrabAction::GrabOrInteract, _) | (GrabAction::Toggle, false) => {
                let outcome = grabber.request_grab_or_interact(target.get(), |entity| {
                    let (grabbable, state, _, body, gravity, locked) = payloads.get(entity).ok()?;
                    let rigid_body = if state.is_in_container() {
                        RigidBody::Dynamic
                    } else {
                        body.copied().unwrap_or(RigidBody::Dynamic)
                    };
                    let restore = BodyRestore {
                        gravity_scale: gravity.map_or(1.0, |g| g.0),
                        locked_axes: locked.copied().unwrap_or_default(),
                        rigid_body,
                    };
                    Some(HoldSession::new(entity, grabbable, &config, restore))
                });

                match outcome {
                    GrabOutcome::Interacted(entity) => {
                        debug!("Interacted with {entity}");
                        interacted.write(Interacted { entity });
                    }
                    GrabOutcome::Grabbed(entity) => {
                        if let Ok((_, mut state, ..)) = payloads.get_mut(entity) {
                            *state = PayloadState::Held;
                        }
                        begin_hold(&mut commands, entity, config.hold_mode);
                        info!("Grabbed {entity}");
                        hold_changes.write(HoldStateChanged {
                            holding: true,
                            payload: Some(entity),
                        });
                    }
                    GrabOutcome::NoTarget | GrabOutcome::Busy => {}
                }
            }
            (GrabAction::Drop, _) | (GrabAction::Toggle, true) => {
                let Some(session) = grabber.request_drop() else {
                    continue;
                };
                end_hold(&mut commands, &mut payloads, &session, None);
                info!("Dropped {}", session.payload);
                hold_changes.write(HoldStateChanged {
                    holding: false,
                    payload: Some(session.payload),
                });
            }
            (GrabAction::Throw, _) => {
                let excluded = cast_exclusions(actor, grabber.held(), &colliders);
                let outcome = grabber.request_throw(|_| {
                    evaluate_throw(physics, &viewpoint, &config, &excluded)
                });

                match outcome {
                    ThrowOutcome::Thrown { session, impulse } => {
                        end_hold(&mut commands, &mut payloads, &session, Some(impulse));
                        info!("Threw {} with impulse {impulse}", session.payload);
                        hold_changes.write(HoldStateChanged {
                            holding: false,
                            payload: Some(session.payload),
                        });
                    }
                    ThrowOutcome::Refused => {
                        debug!("Throw refused: surface too close");
                    }
                    ThrowOutcome::NotHolding => {}
                }
            }
        }
    }
}

/// Take motion authority over a payload.
fn begin_hold(commands: &mut Commands, payload: Entity, mode: HoldMode) {
    let mut entity = commands.entity(payload);
    entity.insert((LinearVelocity::ZERO, AngularVelocity::ZERO));
    match mode {
        HoldMode::Physics => {
            entity.insert((
                RigidBody::Dynamic,
                GravityScale(0.0),
                LockedAxes::ROTATION_LOCKED,
            ));
        }
        HoldMode::Kinematic => {
            entity.insert(RigidBody::Kinematic);
        }
    }
}

/// Hand a payload back to the physics world, optionally with a throw impulse.
fn end_hold(
    commands: &mut Commands,
    payloads: &mut Query<PayloadBody>,
    session: &HoldSession,
    impulse: Option<Vec3>,
) {
    let Ok((grabbable, mut state, velocity, ..)) = payloads.get_mut(session.payload) else {
        return;
    };
    *state = PayloadState::Free;

    let restore = session.restore;
    let mut entity = commands.entity(session.payload);
    entity.insert((
        restore.rigid_body,
        GravityScale(restore.gravity_scale),
        restore.locked_axes,
    ));

    if let Some(impulse) = impulse {
        let thrown = velocity_after_impulse(velocity.0, impulse, grabbable.mass);
        entity.insert(LinearVelocity(thrown));
    }
}

/// Everything [`update_held_payload`] touches besides the physics world.
#[derive(SystemParam)]
pub struct HeldPayloadContext<'w, 's> {
    config: Res<'w, GrabConfig>,
    lift: Res<'w, LiftDirection>,
    time: Res<'w, Time>,
    grabbers: Query<'w, 's, (Entity, &'static mut Grabber, &'static GlobalTransform)>,
    payloads: Query<
        'w,
        's,
        (
            &'static mut Transform,
            &'static mut LinearVelocity,
            &'static mut AngularVelocity,
        ),
        With<Grabbable>,
    >,
    colliders: Query<'w, 's, (Entity, &'static ColliderOf)>,
}

/// System that moves the held payload toward its hold position.
pub fn update_held_payload(spatial_query: SpatialQuery, context: HeldPayloadContext) {
    drive_held_payload(&AvianPhysics::new(&spatial_query), context);
}

/// Steer the held payload for one frame, avoiding geometry known to `physics`.
///
/// Unobstructed payloads are moved through `LinearVelocity` in both hold
/// modes, so their speed is visible to impact damage. Obstructed payloads are
/// placed in front of the obstruction and stopped.
pub fn drive_held_payload<P: PhysicsQuery>(physics: &P, context: HeldPayloadContext) {
    let HeldPayloadContext {
        config,
        lift,
        time,
        mut grabbers,
        mut payloads,
        colliders,
    } = context;

    let Ok((actor, mut grabber, eye)) = grabbers.single_mut() else {
        return;
    };
    let excluded = cast_exclusions(actor, grabber.held(), &colliders);
    let Some(session) = grabber.session_mut() else {
        return;
    };

    let delta_secs = time.delta_secs();
    session.lift_offset = step_lift_offset(session.lift_offset, *lift, &config, delta_secs);

    let Ok((mut transform, mut linear, mut angular)) = payloads.get_mut(session.payload) else {
        return;
    };

    let viewpoint = Viewpoint::from_global_transform(eye);
    let desired = desired_hold_position(&viewpoint, session, config.min_hold_distance);
    let target = resolve_hold_target(
        physics,
        &viewpoint,
        desired,
        config.min_hold_distance,
        config.solid_layers,
        &excluded,
    );

    angular.0 = Vec3::ZERO;

    match hold_velocity(
        transform.translation,
        &target,
        config.hold_mode,
        session.smoothing,
        delta_secs,
    ) {
        Some(velocity) => linear.0 = velocity,
        None => {
            transform.translation = target.position;
            linear.0 = Vec3::ZERO;
        }
    }
}
