use avian3d::prelude::*;
use bevy::prelude::*;

use crate::container::PayloadState;
use crate::targeting::Grabbable;

use super::{ImpactDamage, Integrity, PayloadDamaged, PayloadDestroyed};

/// System that applies speed-based damage to every grabbable payload.
///
/// Payloads stored in a container are skipped. A payload whose integrity runs
/// out is despawned; an active hold on it is released on the next frame.
pub fn evaluate_impact_damage(
    mut commands: Commands,
    time: Res<Time>,
    mut payloads: Query<(
        Entity,
        &Grabbable,
        &PayloadState,
        &LinearVelocity,
        &mut ImpactDamage,
        &mut Integrity,
    )>,
    mut damaged: MessageWriter<PayloadDamaged>,
    mut destroyed: MessageWriter<PayloadDestroyed>,
) {
    let now = time.elapsed_secs();

    for (entity, grabbable, state, velocity, mut impact, mut integrity) in &mut payloads {
        if state.is_in_container() {
            continue;
        }

        let speed = velocity.0.length();
        let Some(amount) = impact.evaluate(grabbable.mass, speed, now) else {
            continue;
        };

        let gone = integrity.take_damage(amount);
        debug!(
            "{entity} took {amount} impact damage at speed {speed:.2}, {} left",
            integrity.current
        );
        damaged.write(PayloadDamaged {
            entity,
            amount,
            remaining: integrity.current,
        });

        if gone {
            info!("{entity} destroyed by impact");
            commands.entity(entity).despawn();
            destroyed.write(PayloadDestroyed { entity });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Resource, Default)]
    struct Collected {
        damaged: Vec<PayloadDamaged>,
        destroyed: Vec<PayloadDestroyed>,
    }

    fn collect(
        mut damaged: MessageReader<PayloadDamaged>,
        mut destroyed: MessageReader<PayloadDestroyed>,
        mut collected: ResMut<Collected>,
    ) {
        collected.damaged.extend(damaged.read().copied());
        collected.destroyed.extend(destroyed.read().copied());
    }

    fn setup_app() -> App {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default())
            .init_resource::<Collected>()
            .add_message::<PayloadDamaged>()
            .add_message::<PayloadDestroyed>()
            .add_systems(Update, (evaluate_impact_damage, collect).chain());
        app
    }

    fn advance(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.update();
    }

    #[test]
    fn test_damage_respects_cooldown_over_frames() {
        let mut app = setup_app();
        let payload = app
            .world_mut()
            .spawn((
                Grabbable::new(2.0),
                LinearVelocity(Vec3::new(12.0, 0.0, 0.0)),
                ImpactDamage::new(10.0, 0.2),
                Integrity::new(10),
            ))
            .id();

        // t = 0: first hit.
        app.update();
        // t = 0.1: cooling down.
        advance(&mut app, 100);
        // t = 0.25: second hit.
        advance(&mut app, 150);

        let collected = app.world().resource::<Collected>();
        assert_eq!(
            collected.damaged,
            vec![
                PayloadDamaged {
                    entity: payload,
                    amount: 3,
                    remaining: 7
                },
                PayloadDamaged {
                    entity: payload,
                    amount: 3,
                    remaining: 4
                },
            ]
        );
        let impact = app.world().get::<ImpactDamage>(payload).unwrap();
        assert!((impact.last_damage.unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_slow_or_stored_payloads_take_no_damage() {
        let mut app = setup_app();
        let slow = app
            .world_mut()
            .spawn((
                Grabbable::new(5.0),
                LinearVelocity(Vec3::new(0.0, -3.0, 0.0)),
                ImpactDamage::default(),
            ))
            .id();
        let stored = app
            .world_mut()
            .spawn((
                Grabbable::new(5.0),
                PayloadState::InContainer,
                LinearVelocity(Vec3::new(0.0, -30.0, 0.0)),
                ImpactDamage::default(),
            ))
            .id();

        app.update();

        assert!(app.world().resource::<Collected>().damaged.is_empty());
        assert_eq!(app.world().get::<Integrity>(slow), Some(&Integrity::new(100)));
        assert_eq!(app.world().get::<Integrity>(stored), Some(&Integrity::new(100)));
    }

    #[test]
    fn test_destroyed_payload_is_despawned() {
        let mut app = setup_app();
        let payload = app
            .world_mut()
            .spawn((
                Grabbable::new(3.0),
                LinearVelocity(Vec3::new(0.0, 0.0, -20.0)),
                ImpactDamage::default(),
                Integrity::new(4),
            ))
            .id();

        app.update();

        let collected = app.world().resource::<Collected>();
        assert_eq!(collected.destroyed, vec![PayloadDestroyed { entity: payload }]);
        assert_eq!(collected.damaged[0].remaining, 0);
        assert!(app.world().get_entity(payload).is_err());
    }
}
