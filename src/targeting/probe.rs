use avian3d::prelude::*;
use bevy::{ecs::system::SystemParam, prelude::*};

use crate::config::GrabConfig;
use crate::grab::Grabber;
use crate::physics::{cast_exclusions, AvianPhysics, PhysicsQuery, Viewpoint};

use super::{Capability, CurrentTarget, Grabbable, Interactable, ProbeHit};

/// Cast one forward ray and classify the nearest hit.
///
/// `classify` maps a hit collider to the entity that carries a capability,
/// or `None` for geometry the actor cannot use. A hit on such geometry still
/// blocks everything behind it.
pub fn acquire_target<P: PhysicsQuery>(
    physics: &P,
    viewpoint: &Viewpoint,
    max_range: f32,
    layer_filter: LayerMask,
    excluded: &[Entity],
    classify: impl Fn(Entity) -> Option<(Entity, Capability)>,
) -> Option<ProbeHit> {
    let hit = physics.ray_cast(
        viewpoint.position,
        viewpoint.forward,
        max_range,
        layer_filter,
        excluded,
    )?;
    let (entity, capability) = classify(hit.entity)?;

    Some(ProbeHit {
        entity,
        point: hit.point,
        distance: hit.distance,
        capability,
    })
}

/// Capability of an entity; interactables win over grabbables.
pub fn capability_of(
    entity: Entity,
    interactables: &Query<(), With<Interactable>>,
    grabbables: &Query<(), With<Grabbable>>,
) -> Option<Capability> {
    if interactables.contains(entity) {
        Some(Capability::Interactable)
    } else if grabbables.contains(entity) {
        Some(Capability::Grabbable)
    } else {
        None
    }
}

/// Everything [`probe_targets`] reads besides the physics world.
#[derive(SystemParam)]
pub struct TargetingContext<'w, 's> {
    config: Res<'w, GrabConfig>,
    grabbers: Query<'w, 's, (Entity, &'static Grabber, &'static GlobalTransform)>,
    interactables: Query<'w, 's, (), With<Interactable>>,
    grabbables: Query<'w, 's, (), With<Grabbable>>,
    colliders: Query<'w, 's, (Entity, &'static ColliderOf)>,
    current: ResMut<'w, CurrentTarget>,
}

/// System that casts the targeting ray once per frame.
pub fn probe_targets(spatial_query: SpatialQuery, context: TargetingContext) {
    refresh_target(&AvianPhysics::new(&spatial_query), context);
}

/// Recompute [`CurrentTarget`] against `physics`.
pub fn refresh_target<P: PhysicsQuery>(physics: &P, context: TargetingContext) {
    let TargetingContext {
        config,
        grabbers,
        interactables,
        grabbables,
        colliders,
        mut current,
    } = context;

    let Ok((actor, grabber, transform)) = grabbers.single() else {
        current.set_if_neq(CurrentTarget(None));
        return;
    };

    let viewpoint = Viewpoint::from_global_transform(transform);
    let excluded = cast_exclusions(actor, grabber.held(), &colliders);

    let hit = acquire_target(
        physics,
        &viewpoint,
        config.pickup_range,
        config.interactive_layers,
        &excluded,
        |entity| {
            if let Some(capability) = capability_of(entity, &interactables, &grabbables) {
                return Some((entity, capability));
            }
            let (_, collider_of) = colliders.get(entity).ok()?;
            let body = collider_of.body;
            capability_of(body, &interactables, &grabbables).map(|capability| (body, capability))
        },
    );

    current.set_if_neq(CurrentTarget(hit));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grab::{BodyRestore, GrabState, HoldSession};
    use crate::physics::mock::MockPhysics;
    use crate::physics::GrabLayer;

    fn viewpoint() -> Viewpoint {
        Viewpoint::new(Vec3::ZERO, Dir3::NEG_Z)
    }

    fn interactive() -> LayerMask {
        GrabLayer::Interactive.into()
    }

    #[test]
    fn test_grabbable_within_range_is_acquired() {
        let mut world = World::new();
        let crate_box = world.spawn_empty().id();
        let physics = MockPhysics::default().with_sphere(
            crate_box,
            GrabLayer::Interactive,
            Vec3::new(0.0, 0.0, -2.5),
            0.5,
        );

        let hit = acquire_target(&physics, &viewpoint(), 3.0, interactive(), &[], |e| {
            (e == crate_box).then_some((e, Capability::Grabbable))
        })
        .expect("box is 2 units away");

        assert_eq!(hit.entity, crate_box);
        assert_eq!(hit.capability, Capability::Grabbable);
        assert!((hit.distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_range_is_none() {
        let mut world = World::new();
        let far = world.spawn_empty().id();
        let physics = MockPhysics::default().with_sphere(
            far,
            GrabLayer::Interactive,
            Vec3::new(0.0, 0.0, -5.0),
            0.5,
        );

        let hit = acquire_target(&physics, &viewpoint(), 3.0, interactive(), &[], |e| {
            Some((e, Capability::Grabbable))
        });
        assert!(hit.is_none());
    }

    #[test]
    fn test_other_layers_are_ignored() {
        let mut world = World::new();
        let wall = world.spawn_empty().id();
        let physics = MockPhysics::default().with_plane(
            wall,
            GrabLayer::Default,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::Z,
        );

        let hit = acquire_target(&physics, &viewpoint(), 3.0, interactive(), &[], |e| {
            Some((e, Capability::Interactable))
        });
        assert!(hit.is_none());
    }

    #[test]
    fn test_unclassified_hit_blocks_target_behind_it() {
        let mut world = World::new();
        let decoration = world.spawn_empty().id();
        let crate_box = world.spawn_empty().id();
        let physics = MockPhysics::default()
            .with_sphere(decoration, GrabLayer::Interactive, Vec3::new(0.0, 0.0, -1.5), 0.3)
            .with_sphere(crate_box, GrabLayer::Interactive, Vec3::new(0.0, 0.0, -2.5), 0.3);

        let hit = acquire_target(&physics, &viewpoint(), 3.0, interactive(), &[], |e| {
            (e == crate_box).then_some((e, Capability::Grabbable))
        });
        assert!(hit.is_none());
    }

    #[test]
    fn test_excluded_entities_are_skipped() {
        let mut world = World::new();
        let held = world.spawn_empty().id();
        let door = world.spawn_empty().id();
        let physics = MockPhysics::default()
            .with_sphere(held, GrabLayer::Interactive, Vec3::new(0.0, 0.0, -1.0), 0.3)
            .with_sphere(door, GrabLayer::Interactive, Vec3::new(0.0, 0.0, -2.5), 0.3);

        let hit = acquire_target(&physics, &viewpoint(), 3.0, interactive(), &[held], |e| {
            Some((e, Capability::Interactable))
        })
        .expect("door is visible past the held object");
        assert_eq!(hit.entity, door);
    }

    #[test]
    fn test_interactable_takes_precedence() {
        let mut world = World::new();
        let both = world.spawn((Interactable, Grabbable::default())).id();
        let only_grab = world.spawn(Grabbable::default()).id();
        let nothing = world.spawn_empty().id();

        let mut state = bevy::ecs::system::SystemState::<(
            Query<(), With<Interactable>>,
            Query<(), With<Grabbable>>,
        )>::new(&mut world);
        let (interactables, grabbables) = state.get(&world);

        assert_eq!(
            capability_of(both, &interactables, &grabbables),
            Some(Capability::Interactable)
        );
        assert_eq!(
            capability_of(only_grab, &interactables, &grabbables),
            Some(Capability::Grabbable)
        );
        assert_eq!(capability_of(nothing, &interactables, &grabbables), None);
    }

    #[derive(Resource, Default)]
    struct TestPhysics(MockPhysics);

    fn refresh_in_test_world(physics: Res<TestPhysics>, context: TargetingContext) {
        refresh_target(&physics.0, context);
    }

    fn targeting_app() -> App {
        let mut app = App::new();
        app.insert_resource(GrabConfig::default())
            .init_resource::<CurrentTarget>()
            .init_resource::<TestPhysics>()
            .add_systems(Update, refresh_in_test_world);
        app
    }

    fn eye() -> GlobalTransform {
        GlobalTransform::from(Transform::from_xyz(0.0, 1.6, 0.0))
    }

    #[test]
    fn test_child_collider_targets_its_body() {
        let mut app = targeting_app();
        app.world_mut().spawn((Grabber::default(), eye()));
        let body = app.world_mut().spawn(Grabbable::new(1.0)).id();
        let collider = app.world_mut().spawn(ColliderOf { body }).id();
        app.insert_resource(TestPhysics(MockPhysics::default().with_sphere(
            collider,
            GrabLayer::Interactive,
            Vec3::new(0.0, 1.6, -2.0),
            0.3,
        )));

        app.update();

        let target = app.world().resource::<CurrentTarget>();
        assert_eq!(target.capability(), Some((body, Capability::Grabbable)));
    }

    #[test]
    fn test_held_payload_with_child_collider_is_not_targeted() {
        let mut app = targeting_app();
        let actor = app.world_mut().spawn((Grabber::default(), eye())).id();
        let body = app.world_mut().spawn(Grabbable::new(1.0)).id();
        let collider = app.world_mut().spawn(ColliderOf { body }).id();
        app.insert_resource(TestPhysics(MockPhysics::default().with_sphere(
            collider,
            GrabLayer::Interactive,
            Vec3::new(0.0, 1.6, -2.0),
            0.3,
        )));
        app.update();
        assert_eq!(app.world().resource::<CurrentTarget>().entity(), Some(body));

        let session = HoldSession::new(
            body,
            &Grabbable::new(1.0),
            &GrabConfig::default(),
            BodyRestore::default(),
        );
        app.world_mut().get_mut::<Grabber>(actor).unwrap().state = GrabState::Holding(session);
        app.update();

        assert_eq!(*app.world().resource::<CurrentTarget>(), CurrentTarget(None));
    }

    #[test]
    fn test_no_grabber_clears_target() {
        let mut app = targeting_app();
        let door = app.world_mut().spawn(Interactable).id();
        app.insert_resource(CurrentTarget(Some(ProbeHit {
            entity: door,
            point: Vec3::ZERO,
            distance: 1.0,
            capability: Capability::Interactable,
        })));

        app.update();

        assert_eq!(*app.world().resource::<CurrentTarget>(), CurrentTarget(None));
    }
}
