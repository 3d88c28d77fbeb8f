//! Procedural demo vehicle
//!
//! Builds a named hierarchy shaped like an imported car model:
//! - `BodyParts` container whose direct children are the hinge groups
//! - one hinge group per movable panel (hood, trunk, doors, roof, wheels)
//! - an `Other` bucket for the chassis and interior, which never explodes
//!
//! Panels carry nested sub-meshes (badge, mirrors, hubs) so picking a child
//! resolves up to its hinge group.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::asset::RenderAssetUsages;
use std::f32::consts::FRAC_PI_2;

/// Entities the placement code needs after spawning
#[derive(Debug, Clone, Copy)]
pub struct DemoVehicle {
    pub root: Entity,
    pub body_parts: Entity,
}

struct VehiclePalette {
    paint: Handle<StandardMaterial>,
    glass: Handle<StandardMaterial>,
    rubber: Handle<StandardMaterial>,
    chrome: Handle<StandardMaterial>,
    interior: Handle<StandardMaterial>,
}

impl VehiclePalette {
    fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            paint: materials.add(StandardMaterial {
                base_color: Color::srgb(0.75, 0.08, 0.1),
                perceptual_roughness: 0.35,
                metallic: 0.4,
                ..default()
            }),
            glass: materials.add(StandardMaterial {
                base_color: Color::srgba(0.6, 0.75, 0.9, 0.45),
                alpha_mode: AlphaMode::Blend,
                perceptual_roughness: 0.1,
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
            rubber: materials.add(StandardMaterial {
                base_color: Color::srgb(0.05, 0.05, 0.05),
                perceptual_roughness: 0.9,
                ..default()
            }),
            chrome: materials.add(StandardMaterial {
                base_color: Color::srgb(0.8, 0.8, 0.85),
                metallic: 1.0,
                perceptual_roughness: 0.15,
                ..default()
            }),
            interior: materials.add(StandardMaterial {
                base_color: Color::srgb(0.2, 0.18, 0.16),
                perceptual_roughness: 0.8,
                ..default()
            }),
        }
    }
}

// ============================================================================
// WINDSHIELD MESH
// ============================================================================

/// Slanted windshield panel, hinged at its lower edge (local origin)
pub fn create_windshield_mesh(meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
    let half_width = 0.68;
    let rise = 0.45;
    let run = -0.55;

    let positions = vec![
        [-half_width, 0.0, 0.0],
        [half_width, 0.0, 0.0],
        [half_width, rise, run],
        [-half_width, rise, run],
    ];

    // Face normal of the slanted quad, pointing forward and up
    let normal = Vec3::new(0.0, -run, rise).normalize().to_array();
    let normals = vec![normal; 4];
    let uvs = vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    let indices = vec![0, 1, 2, 0, 2, 3];

    let mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices));

    meshes.add(mesh)
}

// ============================================================================
// HIERARCHY
// ============================================================================

fn spawn_group(commands: &mut Commands, parent: Entity, name: &str, transform: Transform) -> Entity {
    commands
        .spawn((Name::new(name.to_string()), transform, Visibility::default(), ChildOf(parent)))
        .id()
}

fn spawn_surface(
    commands: &mut Commands,
    parent: Entity,
    name: &str,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    transform: Transform,
) -> Entity {
    commands
        .spawn((
            Name::new(name.to_string()),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            transform,
            ChildOf(parent),
        ))
        .id()
}

/// Spawn the demo car at `pose`. The car faces +Z, wheels resting on the pose's origin.
pub fn spawn_demo_vehicle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    pose: Transform,
) -> DemoVehicle {
    let palette = VehiclePalette::new(materials);

    let root = commands
        .spawn((Name::new("Vehicle"), pose, Visibility::default()))
        .id();
    let body_parts = spawn_group(commands, root, "BodyParts", Transform::default());

    // Hood: hinged at the windshield base, panel extends forward
    let hood_hinge = spawn_group(commands, body_parts, "Hood_Hinge", Transform::from_xyz(0.0, 0.72, 0.55));
    let hood = spawn_surface(
        commands,
        hood_hinge,
        "Hood",
        meshes.add(Cuboid::new(1.6, 0.05, 1.3)),
        palette.paint.clone(),
        Transform::from_xyz(0.0, 0.0, 0.65),
    );
    spawn_surface(
        commands,
        hood,
        "Badge",
        meshes.add(Cylinder::new(0.07, 0.02)),
        palette.chrome.clone(),
        Transform::from_xyz(0.0, 0.035, 0.55),
    );

    // Trunk: hinged at the rear window, panel extends backward
    let trunk_hinge = spawn_group(commands, body_parts, "Trunk_Hinge", Transform::from_xyz(0.0, 0.78, -1.15));
    spawn_surface(
        commands,
        trunk_hinge,
        "Trunk",
        meshes.add(Cuboid::new(1.6, 0.05, 0.7)),
        palette.paint.clone(),
        Transform::from_xyz(0.0, 0.0, -0.35),
    );

    // Doors: hinged at their front edge
    for (hinge_name, door_name, mirror_name, side) in [
        ("LeftDoor_Hinge", "LeftDoor", "LeftMirror", 1.0),
        ("RightDoor_Hinge", "RightDoor", "RightMirror", -1.0),
    ] {
        let hinge = spawn_group(commands, body_parts, hinge_name, Transform::from_xyz(0.83 * side, 0.55, 0.5));
        let door = spawn_surface(
            commands,
            hinge,
            door_name,
            meshes.add(Cuboid::new(0.05, 0.55, 1.1)),
            palette.paint.clone(),
            Transform::from_xyz(0.0, 0.0, -0.55),
        );
        spawn_surface(
            commands,
            door,
            mirror_name,
            meshes.add(Cuboid::new(0.18, 0.1, 0.06)),
            palette.chrome.clone(),
            Transform::from_xyz(0.1 * side, 0.3, 0.5),
        );
    }

    // Roof with the windshield hanging off its front edge
    let roof_hinge = spawn_group(commands, body_parts, "Roof_Hinge", Transform::from_xyz(0.0, 1.22, -0.35));
    spawn_surface(
        commands,
        roof_hinge,
        "Roof",
        meshes.add(Cuboid::new(1.4, 0.05, 1.2)),
        palette.paint.clone(),
        Transform::default(),
    );
    spawn_surface(
        commands,
        roof_hinge,
        "Windshield",
        create_windshield_mesh(meshes),
        palette.glass.clone(),
        Transform::from_xyz(0.0, -0.45, 0.9),
    );

    let tire_mesh = meshes.add(Cylinder::new(0.33, 0.24));
    let hub_mesh = meshes.add(Cylinder::new(0.16, 0.02));
    for (name, x, z) in [
        ("Wheel_FL_Hinge", 0.82, 1.25),
        ("Wheel_FR_Hinge", -0.82, 1.25),
        ("Wheel_RL_Hinge", 0.82, -1.25),
        ("Wheel_RR_Hinge", -0.82, -1.25),
    ] {
        let hinge = spawn_group(commands, body_parts, name, Transform::from_xyz(x, 0.33, z));
        // Cylinder axis is Y, roll it onto the axle
        let tire = spawn_surface(
            commands,
            hinge,
            "Tire",
            tire_mesh.clone(),
            palette.rubber.clone(),
            Transform::from_rotation(Quat::from_rotation_z(FRAC_PI_2)),
        );
        spawn_surface(
            commands,
            tire,
            "Hub",
            hub_mesh.clone(),
            palette.chrome.clone(),
            Transform::from_xyz(0.0, -0.13 * x.signum(), 0.0),
        );
    }

    // Everything that stays put
    let other = spawn_group(commands, body_parts, "Other", Transform::default());
    spawn_surface(
        commands,
        other,
        "Chassis",
        meshes.add(Cuboid::new(1.62, 0.4, 3.6)),
        palette.paint.clone(),
        Transform::from_xyz(0.0, 0.5, 0.0),
    );
    for (name, z) in [("FrontSeats", 0.0), ("RearSeats", -0.7)] {
        spawn_surface(
            commands,
            other,
            name,
            meshes.add(Cuboid::new(1.2, 0.4, 0.45)),
            palette.interior.clone(),
            Transform::from_xyz(0.0, 0.85, z),
        );
    }

    info!("Spawned demo vehicle {:?} at {:?}", root, pose.translation);
    DemoVehicle { root, body_parts }
}
