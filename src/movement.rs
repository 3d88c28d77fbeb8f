// Orbit camera - middle-drag rotates around the focus point, wheel zooms, WASD pans
use bevy::prelude::*;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel, MouseMotion};
use crate::types::*;
use crate::constants::*;

/// Camera pose for an orbit state: `distance` away from the focus point along the yaw/pitch rotation
pub fn orbit_transform(camera: &OrbitCamera) -> Transform {
    let rotation = Quat::from_euler(EulerRot::YXZ, camera.yaw, camera.pitch, 0.0);
    let offset = rotation * Vec3::new(0.0, 0.0, camera.distance);
    Transform {
        translation: camera.focus_point + offset,
        rotation,
        ..default()
    }
}

pub fn orbit_camera_movement(
    time: Res<Time>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut mouse_motion_events: EventReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
) {
    let Ok((mut transform, mut camera)) = camera_query.single_mut() else { return };

    // Mouse drag rotation (middle mouse button - left click is for picking and placement)
    if mouse_button_input.pressed(MouseButton::Middle) {
        for motion in mouse_motion_events.read() {
            camera.yaw -= motion.delta.x * CAMERA_ROTATION_SPEED;
            camera.pitch = (camera.pitch - motion.delta.y * CAMERA_ROTATION_SPEED).clamp(-1.5, -0.05);
        }
    } else {
        // Clear mouse motion events if not dragging to prevent accumulation
        mouse_motion_events.clear();
    }

    let mut movement = Vec3::ZERO;
    if keyboard_input.pressed(KeyCode::KeyW) || keyboard_input.pressed(KeyCode::ArrowUp) {
        movement.z -= 1.0;
    }
    if keyboard_input.pressed(KeyCode::KeyS) || keyboard_input.pressed(KeyCode::ArrowDown) {
        movement.z += 1.0;
    }
    if keyboard_input.pressed(KeyCode::KeyA) || keyboard_input.pressed(KeyCode::ArrowLeft) {
        movement.x -= 1.0;
    }
    if keyboard_input.pressed(KeyCode::KeyD) || keyboard_input.pressed(KeyCode::ArrowRight) {
        movement.x += 1.0;
    }
    if movement.length() > 0.0 {
        // Only yaw so panning stays on the ground plane
        let movement = movement.normalize() * CAMERA_PAN_SPEED * time.delta_secs();
        let yaw = camera.yaw;
        camera.focus_point += Mat3::from_rotation_y(yaw) * movement;
    }

    for scroll in scroll_events.read() {
        let zoom_delta = match scroll.unit {
            MouseScrollUnit::Line => scroll.y * CAMERA_ZOOM_SPEED,
            MouseScrollUnit::Pixel => scroll.y * CAMERA_ZOOM_SPEED * 0.1,
        };
        camera.distance = (camera.distance - zoom_delta).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    *transform = orbit_transform(&camera);
}
