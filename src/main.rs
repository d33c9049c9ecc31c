//! Example grab-and-throw room.
//!
//! Run with: `cargo run`

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_grab_3d::prelude::*;
use bevy_grab_3d::prelude::InteractionPlugin;

fn main() {
    let interaction = match InteractionPlugin::new(GrabConfig::default().with_throw_force(12.0)) {
        Ok(plugin) => plugin,
        Err(err) => {
            eprintln!("invalid grab configuration: {err}");
            return;
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Grab Example".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(interaction)
        .add_plugins(ImpactDamagePlugin)
        .add_plugins(DoorPlugin)
        .add_plugins(FirstPersonCameraPlugin)
        .add_systems(Startup, (setup, spawn_crosshair))
        .add_systems(
            Update,
            (
                update_crosshair,
                draw_highlights,
                log_hold_changes,
                log_destroyed_payloads,
                show_help,
            )
                .after(InteractionSystems::Hold),
        )
        .run();
}

/// Marker for the crosshair UI node.
#[derive(Component)]
struct Crosshair;

fn solid() -> CollisionLayers {
    CollisionLayers::new(GrabLayer::Default, LayerMask::ALL)
}

fn interactive() -> CollisionLayers {
    CollisionLayers::new(GrabLayer::Interactive, LayerMask::ALL)
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Camera: the player's eye and the grabber
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.6, 6.0),
        FirstPersonCamera::default(),
        Grabber::default(),
        AmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
            ..default()
        },
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(20.0, 0.2, 20.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.35, 0.38))),
        Transform::from_xyz(0.0, -0.1, 0.0),
        RigidBody::Static,
        Collider::cuboid(20.0, 0.2, 20.0),
        solid(),
    ));

    // Back wall, close enough to test clipping and refused throws
    let wall_material = materials.add(Color::srgb(0.6, 0.55, 0.5));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(10.0, 3.0, 0.3))),
        MeshMaterial3d(wall_material.clone()),
        Transform::from_xyz(0.0, 1.5, -4.0),
        RigidBody::Static,
        Collider::cuboid(10.0, 3.0, 0.3),
        solid(),
    ));

    // Crates of increasing mass: heavier ones are carried lower
    let crate_mesh = meshes.add(Cuboid::new(0.6, 0.6, 0.6));
    for (i, mass) in [0.5_f32, 1.0, 2.0, 4.0].into_iter().enumerate() {
        let shade = 0.8 - i as f32 * 0.15;
        commands.spawn((
            Mesh3d(crate_mesh.clone()),
            MeshMaterial3d(materials.add(Color::srgb(shade, 0.5 * shade, 0.2))),
            Transform::from_xyz(-2.25 + i as f32 * 1.5, 0.3, 1.0),
            RigidBody::Dynamic,
            Collider::cuboid(0.6, 0.6, 0.6),
            interactive(),
            Grabbable::new(mass),
            ImpactDamage::default(),
            Integrity::new(10),
        ));
    }

    // Door on a hinge at the right end of the wall
    commands
        .spawn((
            Door::new(0.0),
            Transform::from_xyz(3.0, 0.0, 2.0),
            Visibility::default(),
            RigidBody::Kinematic,
        ))
        .with_children(|hinge| {
            hinge.spawn((
                Mesh3d(meshes.add(Cuboid::new(1.0, 2.2, 0.1))),
                MeshMaterial3d(wall_material),
                Transform::from_xyz(0.5, 1.1, 0.0),
                Collider::cuboid(1.0, 2.2, 0.1),
                interactive(),
            ));
        });
}

fn spawn_crosshair(mut commands: Commands, settings: Res<ReticleSettings>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            width: Val::Px(6.0),
            height: Val::Px(6.0),
            margin: UiRect::all(Val::Px(-3.0)),
            ..default()
        },
        BackgroundColor(settings.default_color),
        Crosshair,
    ));
}

fn update_crosshair(
    reticle: Res<ReticleState>,
    settings: Res<ReticleSettings>,
    mut crosshairs: Query<&mut BackgroundColor, With<Crosshair>>,
) {
    if !reticle.is_changed() {
        return;
    }
    for mut background in &mut crosshairs {
        background.0 = reticle.color(&settings);
    }
}

/// Outline stand-in: a wire sphere around whatever is lit.
fn draw_highlights(
    mut gizmos: Gizmos,
    settings: Res<ReticleSettings>,
    highlighted: Query<(&GlobalTransform, &Highlight, Option<&Door>)>,
) {
    for (transform, highlight, door) in &highlighted {
        if !highlight.is_lit() {
            continue;
        }
        // The door's transform is its hinge; circle the leaf instead.
        let center = match door {
            Some(_) => transform.transform_point(Vec3::new(0.5, 1.1, 0.0)),
            None => transform.translation(),
        };
        gizmos.sphere(
            Isometry3d::from_translation(center),
            0.6,
            settings.highlight_color,
        );
    }
}

fn log_hold_changes(mut changes: MessageReader<HoldStateChanged>, hud: Res<InteractionHud>) {
    for change in changes.read() {
        info!(
            "holding: {} (button: {}, throw available: {})",
            change.holding,
            hud.grab_label(),
            hud.throw_available()
        );
    }
}

fn log_destroyed_payloads(mut destroyed: MessageReader<PayloadDestroyed>) {
    for message in destroyed.read() {
        info!("{} broke apart", message.entity);
    }
}

fn show_help(keyboard: Res<ButtonInput<KeyCode>>) {
    if keyboard.just_pressed(KeyCode::KeyH) {
        println!("\n=== Grab Example Help ===");
        println!("  RMB + drag - Look");
        println!("  WASD       - Walk");
        println!("  E          - Grab / drop / open door");
        println!("  LMB        - Throw held crate");
        println!("  R / F      - Lift / lower held crate");
        println!("  H          - Show this help");
        println!("=========================\n");
    }
}
