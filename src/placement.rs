// Placement module - resolves confirmed holds to ground poses and spawns or moves the vehicle
use bevy::prelude::*;
use bevy::render::render_resource::Face;

use crate::config::{ExplodeConfig, LabelTemplate};
use crate::constants::*;
use crate::explode::ExplodeController;
use crate::math_utils::ray_ground_intersection;
use crate::procedural_meshes::spawn_demo_vehicle;
use crate::types::{AssemblyPlaced, PlacedVehicle, PlacementConfirmed};

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AssemblyPlaced>()
            .add_systems(Update, (resolve_placement_system, place_vehicle_system).chain());
    }
}

/// Explode configuration for a freshly spawned vehicle: constants plus the appearance assets
pub fn build_explode_config(materials: &mut Assets<StandardMaterial>) -> ExplodeConfig {
    let ghost = materials.add(StandardMaterial {
        base_color: GHOST_COLOR,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    // Inverted hull: only back faces of the scaled-up copy show around the silhouette
    let outline = materials.add(StandardMaterial {
        base_color: OUTLINE_COLOR,
        unlit: true,
        cull_mode: Some(Face::Front),
        ..default()
    });

    ExplodeConfig {
        ghost_material: Some(ghost),
        outline_material: Some(outline),
        label_template: Some(LabelTemplate {
            font_size: LABEL_FONT_SIZE,
            text_color: LABEL_TEXT_COLOR,
            plate_size: Vec2::new(LABEL_PLATE_SIZE.0, LABEL_PLATE_SIZE.1),
            plate_color: LABEL_PLATE_COLOR,
            texture_size: UVec2::new(LABEL_TEXTURE_SIZE.0, LABEL_TEXTURE_SIZE.1),
        }),
        ..default()
    }
}

/// Ground pose under a screen point, if the ray reaches the ground plane
pub fn ground_pose(ray_origin: Vec3, ray_direction: Vec3) -> Option<Transform> {
    ray_ground_intersection(ray_origin, ray_direction, GROUND_PLANE_Y).map(Transform::from_translation)
}

/// System: turn confirmed holds into world poses
pub fn resolve_placement_system(
    mut placements: EventReader<PlacementConfirmed>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut placed: EventWriter<AssemblyPlaced>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        placements.clear();
        return;
    };

    for placement in placements.read() {
        let Ok(ray) = camera.viewport_to_world(camera_transform, placement.screen_position) else {
            continue;
        };
        match ground_pose(ray.origin, *ray.direction) {
            Some(pose) => {
                placed.write(AssemblyPlaced { pose });
            }
            None => debug!("No ground under {:?}", placement.screen_position),
        }
    }
}

/// System: first placement spawns the vehicle, later placements move it
pub fn place_vehicle_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut placed: EventReader<AssemblyPlaced>,
    mut vehicle_query: Query<&mut Transform, With<PlacedVehicle>>,
) {
    // Several holds in one frame collapse to the latest
    let Some(AssemblyPlaced { pose }) = placed.read().last().copied() else { return };

    if let Ok(mut transform) = vehicle_query.single_mut() {
        *transform = pose;
        info!("📍 Vehicle repositioned to {:?}", pose.translation);
        return;
    }

    let vehicle = spawn_demo_vehicle(&mut commands, &mut meshes, &mut materials, pose);
    let config = build_explode_config(&mut materials);
    commands.entity(vehicle.root).insert((
        PlacedVehicle,
        ExplodeController {
            body_parts: Some(vehicle.body_parts),
            config,
        },
    ));
    info!("📍 Vehicle placed at {:?}", pose.translation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn placement_world() -> World {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        world.init_resource::<Events<AssemblyPlaced>>();
        world
    }

    fn place(world: &mut World, at: Vec3) {
        world.send_event(AssemblyPlaced { pose: Transform::from_translation(at) });
        world.run_system_once(place_vehicle_system).unwrap();
        world.resource_mut::<Events<AssemblyPlaced>>().clear();
    }

    #[test]
    fn ground_pose_hits_plane() {
        let pose = ground_pose(Vec3::new(0.0, 4.0, 4.0), Vec3::new(0.0, -1.0, -1.0)).unwrap();
        assert!((pose.translation - Vec3::new(0.0, GROUND_PLANE_Y, 0.0)).length() < 1e-5);
        assert!(ground_pose(Vec3::new(0.0, 4.0, 0.0), Vec3::Y).is_none());
    }

    #[test]
    fn first_placement_spawns_controller() {
        let mut world = placement_world();
        place(&mut world, Vec3::new(1.0, 0.0, 2.0));

        let mut query = world.query_filtered::<(&Transform, &ExplodeController), With<PlacedVehicle>>();
        let (transform, controller) = query.single(&world).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 0.0, 2.0));
        assert!(controller.body_parts.is_some());
        assert!(controller.config.validate().is_ok());
        assert!(controller.config.label_template().is_ok());
    }

    #[test]
    fn later_placement_moves_existing_vehicle() {
        let mut world = placement_world();
        place(&mut world, Vec3::new(1.0, 0.0, 2.0));
        place(&mut world, Vec3::new(-3.0, 0.0, 0.5));

        let mut query = world.query_filtered::<&Transform, With<PlacedVehicle>>();
        let poses: Vec<Vec3> = query.iter(&world).map(|t| t.translation).collect();
        assert_eq!(poses, vec![Vec3::new(-3.0, 0.0, 0.5)]);
    }
}
