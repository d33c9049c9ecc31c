//! Physics world queries used by targeting, holding and throwing.
//!
//! The interaction core never talks to avian3d directly. It issues ray and line
//! casts through [`PhysicsQuery`], which [`AvianPhysics`] implements on top of
//! avian's [`SpatialQuery`]. Tests provide their own implementation.

use avian3d::prelude::*;
use bevy::prelude::*;

/// Collision layers recognised by the interaction subsystem.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GrabLayer {
    /// Static and dynamic level geometry.
    #[default]
    Default,
    /// Objects the probe can target: grabbables and interactables.
    Interactive,
    /// The actor's own body, ignored by every query.
    Actor,
}

/// Every layer outside `interactive` and `actor`.
pub fn solid_mask(interactive: LayerMask, actor: LayerMask) -> LayerMask {
    LayerMask(!(interactive.0 | actor.0))
}

/// Nearest hit reported by a ray or line cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// The collider entity that was hit.
    pub entity: Entity,
    /// World-space hit position.
    pub point: Vec3,
    /// Surface normal at the hit.
    pub normal: Vec3,
    /// Distance from the cast origin.
    pub distance: f32,
}

/// Directional and segment queries against the physics world.
pub trait PhysicsQuery {
    /// Cast a ray and return the nearest hit on a collider whose membership
    /// intersects `mask`, ignoring `excluded` entities.
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
        excluded: &[Entity],
    ) -> Option<HitInfo>;

    /// Cast along the segment `from -> to`.
    fn line_cast(
        &self,
        from: Vec3,
        to: Vec3,
        mask: LayerMask,
        excluded: &[Entity],
    ) -> Option<HitInfo> {
        let delta = to - from;
        let length = delta.length();
        let direction = Dir3::new(delta).ok()?;
        self.ray_cast(from, direction, length, mask, excluded)
    }
}

/// [`PhysicsQuery`] backed by avian's spatial query pipeline.
pub struct AvianPhysics<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
}

impl<'a, 'w, 's> AvianPhysics<'a, 'w, 's> {
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>) -> Self {
        Self { spatial_query }
    }
}

impl PhysicsQuery for AvianPhysics<'_, '_, '_> {
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
        excluded: &[Entity],
    ) -> Option<HitInfo> {
        let filter = SpatialQueryFilter::default()
            .with_mask(mask)
            .with_excluded_entities(excluded.iter().copied());

        let hit = self
            .spatial_query
            .cast_ray(origin, direction, max_distance, true, &filter)?;

        Some(HitInfo {
            entity: hit.entity,
            point: origin + *direction * hit.distance,
            normal: hit.normal,
            distance: hit.distance,
        })
    }
}

/// Entities a cast made for `actor` ignores: the actor, the held payload and
/// every collider attached to either body.
///
/// Spatial query filters match collider entities, so a body whose colliders
/// live on child entities is only hidden once those children are listed.
pub fn cast_exclusions(
    actor: Entity,
    held: Option<Entity>,
    colliders: &Query<(Entity, &ColliderOf)>,
) -> Vec<Entity> {
    let bodies: Vec<Entity> = std::iter::once(actor).chain(held).collect();
    let attached = colliders
        .iter()
        .filter(|(_, collider_of)| bodies.contains(&collider_of.body))
        .map(|(entity, _)| entity);
    bodies.iter().copied().chain(attached).collect()
}

/// The actor's eye: where casts start and which way they point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Vec3,
    pub forward: Dir3,
}

impl Viewpoint {
    pub fn new(position: Vec3, forward: Dir3) -> Self {
        Self { position, forward }
    }

    /// Read position and forward (-Z) from a world transform.
    pub fn from_global_transform(transform: &GlobalTransform) -> Self {
        Self {
            position: transform.translation(),
            forward: transform.forward(),
        }
    }

    /// Point `distance` units straight ahead.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.position + *self.forward * distance
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Analytic stand-in for the physics world.

    use super::*;

    #[derive(Debug, Clone, Copy)]
    pub enum MockShape {
        Sphere { center: Vec3, radius: f32 },
        /// Infinite plane, hit from either side.
        Plane { point: Vec3, normal: Vec3 },
    }

    #[derive(Debug, Clone, Copy)]
    pub struct MockCollider {
        pub entity: Entity,
        pub layers: LayerMask,
        pub shape: MockShape,
    }

    #[derive(Debug, Default)]
    pub struct MockPhysics {
        pub colliders: Vec<MockCollider>,
    }

    impl MockPhysics {
        pub fn with_sphere(
            mut self,
            entity: Entity,
            layer: GrabLayer,
            center: Vec3,
            radius: f32,
        ) -> Self {
            self.colliders.push(MockCollider {
                entity,
                layers: layer.into(),
                shape: MockShape::Sphere { center, radius },
            });
            self
        }

        pub fn with_plane(
            mut self,
            entity: Entity,
            layer: GrabLayer,
            point: Vec3,
            normal: Vec3,
        ) -> Self {
            self.colliders.push(MockCollider {
                entity,
                layers: layer.into(),
                shape: MockShape::Plane {
                    point,
                    normal: normal.normalize(),
                },
            });
            self
        }
    }

    fn intersect(shape: &MockShape, origin: Vec3, direction: Vec3) -> Option<(f32, Vec3)> {
        match *shape {
            MockShape::Sphere { center, radius } => {
                let oc = origin - center;
                let b = oc.dot(direction);
                let c = oc.dot(oc) - radius * radius;
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                let t = -b - discriminant.sqrt();
                if t < 0.0 {
                    return None;
                }
                let point = origin + direction * t;
                Some((t, (point - center).normalize_or_zero()))
            }
            MockShape::Plane { point, normal } => {
                let denom = normal.dot(direction);
                if denom.abs() < 1e-6 {
                    return None;
                }
                let t = (point - origin).dot(normal) / denom;
                if t < 0.0 {
                    return None;
                }
                let facing = if denom > 0.0 { -normal } else { normal };
                Some((t, facing))
            }
        }
    }

    impl PhysicsQuery for MockPhysics {
        fn ray_cast(
            &self,
            origin: Vec3,
            direction: Dir3,
            max_distance: f32,
            mask: LayerMask,
            excluded: &[Entity],
        ) -> Option<HitInfo> {
            self.colliders
                .iter()
                .filter(|c| c.layers.0 & mask.0 != 0 && !excluded.contains(&c.entity))
                .filter_map(|c| {
                    let (distance, normal) = intersect(&c.shape, origin, *direction)?;
                    (distance <= max_distance).then_some(HitInfo {
                        entity: c.entity,
                        point: origin + *direction * distance,
                        normal,
                        distance,
                    })
                })
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockPhysics;
    use super::*;

    #[test]
    fn test_solid_mask_excludes_interactive_and_actor() {
        let interactive = LayerMask::from(GrabLayer::Interactive);
        let actor = LayerMask::from(GrabLayer::Actor);
        let solid = solid_mask(interactive, actor);
        assert_eq!(solid.0 & interactive.0, 0);
        assert_eq!(solid.0 & actor.0, 0);
        assert_ne!(solid.0 & LayerMask::from(GrabLayer::Default).0, 0);
    }

    #[test]
    fn test_line_cast_stops_at_segment_end() {
        let mut world = World::new();
        let wall = world.spawn_empty().id();
        let physics = MockPhysics::default().with_plane(
            wall,
            GrabLayer::Default,
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::Z,
        );

        let mask = LayerMask::ALL;
        assert!(physics
            .line_cast(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0), mask, &[])
            .is_none());

        let hit = physics
            .line_cast(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), mask, &[])
            .expect("wall lies on the segment");
        assert_eq!(hit.entity, wall);
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!((hit.point - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_line_cast_degenerate_segment() {
        let physics = MockPhysics::default();
        assert!(physics
            .line_cast(Vec3::ONE, Vec3::ONE, LayerMask::ALL, &[])
            .is_none());
    }

    #[test]
    fn test_exclusions_cover_child_colliders() {
        let mut world = World::new();
        let actor = world.spawn_empty().id();
        let payload = world.spawn_empty().id();
        let handle = world.spawn(ColliderOf { body: payload }).id();
        let lid = world.spawn(ColliderOf { body: payload }).id();
        let elsewhere = world.spawn_empty().id();
        let other = world.spawn(ColliderOf { body: elsewhere }).id();

        let mut state =
            bevy::ecs::system::SystemState::<Query<(Entity, &ColliderOf)>>::new(&mut world);
        let colliders = state.get(&world);

        let excluded = cast_exclusions(actor, Some(payload), &colliders);
        for entity in [actor, payload, handle, lid] {
            assert!(excluded.contains(&entity));
        }
        assert!(!excluded.contains(&other));

        assert_eq!(cast_exclusions(actor, None, &colliders), vec![actor]);
    }

    #[test]
    fn test_viewpoint_from_transform() {
        let transform = GlobalTransform::from(
            Transform::from_xyz(1.0, 2.0, 3.0).looking_to(Vec3::X, Vec3::Y),
        );
        let viewpoint = Viewpoint::from_global_transform(&transform);
        assert!((viewpoint.position - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
        assert!((*viewpoint.forward - Vec3::X).length() < 1e-5);
        assert!((viewpoint.point_at(2.0) - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-5);
    }
}
