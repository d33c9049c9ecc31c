use bevy::{input::mouse::MouseMotion, prelude::*};

/// First-person look and walk controls for the actor's camera.
///
/// Pair it with [`Grabber`](crate::grab::Grabber) on the same entity so the
/// interaction probe sees what the player sees.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
pub struct FirstPersonCamera {
    /// Movement speed in units per second.
    pub speed: f32,
    /// Mouse look sensitivity (radians per pixel).
    pub sensitivity: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Pitch limit either side of the horizon, in radians.
    pub vertical_clamp: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            speed: 4.0,
            sensitivity: 0.003,
            yaw: 0.0,
            pitch: 0.0,
            vertical_clamp: 80f32.to_radians(),
        }
    }
}

impl FirstPersonCamera {
    /// Apply a mouse delta, keeping pitch inside the vertical clamp.
    pub fn look(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = (self.pitch - delta.y * self.sensitivity)
            .clamp(-self.vertical_clamp, self.vertical_clamp);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Walk direction on the ground plane for the pressed WASD keys.
fn walk_direction(keyboard: &ButtonInput<KeyCode>, yaw: f32) -> Vec3 {
    let heading = Quat::from_rotation_y(yaw);
    let forward = heading * Vec3::NEG_Z;
    let right = heading * Vec3::X;

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }
    direction.normalize_or_zero()
}

/// System to handle first-person camera input.
pub fn first_person_camera_input(
    mut cameras: Query<(&mut FirstPersonCamera, &mut Transform)>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut motion: MessageReader<MouseMotion>,
    time: Res<Time>,
) {
    let Ok((mut camera, mut transform)) = cameras.single_mut() else {
        motion.clear();
        return;
    };

    // Look only while the right mouse button is held
    if mouse.pressed(MouseButton::Right) {
        for ev in motion.read() {
            camera.look(ev.delta);
        }
    } else {
        motion.clear();
    }

    let direction = walk_direction(&keyboard, camera.yaw);
    transform.translation += direction * camera.speed * time.delta_secs();
    transform.rotation = camera.rotation();
}
