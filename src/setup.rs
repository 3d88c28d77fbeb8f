// Scene setup module - camera, lights, ground and HUD
use bevy::prelude::*;
use std::f32::consts::PI;
use crate::types::*;
use crate::constants::*;
use crate::movement::orbit_transform;

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Ground plane the placement ray lands on
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.34, 0.3),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_PLANE_Y, 0.0),
        Name::new("Ground"),
    ));

    // Directional light (sun)
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform {
            translation: Vec3::new(0.0, 10.0, 0.0),
            rotation: Quat::from_rotation_x(-PI / 4.0) * Quat::from_rotation_y(PI / 6.0),
            ..default()
        },
    ));

    // Ambient light
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.5, 0.5, 0.6),
        brightness: 400.0,
        affects_lightmapped_meshes: false,
    });

    let orbit = OrbitCamera {
        focus_point: Vec3::ZERO,
        yaw: 0.6,
        pitch: CAMERA_INITIAL_PITCH,
        distance: CAMERA_INITIAL_DISTANCE,
    };
    commands.spawn((
        Camera3d::default(),
        Camera::default(),
        // Label cameras render offscreen; HUD text stays on this one
        IsDefaultUiCamera,
        orbit_transform(&orbit),
        orbit,
    ));

    // Controls help
    commands.spawn((
        Text::new("Hold left mouse / finger: Place vehicle | Click part: Explode or hinge\nE: Toggle explode mode | F: Full explode | Middle-drag: Rotate | Scroll: Zoom | WASD: Pan"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));

    // Mode / phase status (bottom-left)
    commands.spawn((
        Text::new("Mode: --"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(0.3, 0.95, 0.4)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));

    info!("Scene ready. Hold to place the vehicle.");
}
