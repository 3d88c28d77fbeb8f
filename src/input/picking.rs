// Part picking - cursor ray against the world bounds of every registered surface
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::window::PrimaryWindow;

use crate::explode::{Bounds, ExplodeAssembly};
use crate::math_utils::ray_aabb_intersection;
use crate::types::PartSelected;

/// Nearest candidate hit by the ray, if any
pub fn pick_nearest(
    ray_origin: Vec3,
    ray_direction: Vec3,
    candidates: impl IntoIterator<Item = (Entity, Bounds)>,
) -> Option<Entity> {
    candidates
        .into_iter()
        .filter_map(|(entity, bounds)| {
            ray_aabb_intersection(ray_origin, ray_direction, bounds.min, bounds.max)
                .map(|distance| (entity, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// Screen position of a fresh press: left mouse button or a single new touch
fn press_position(
    mouse_button: &ButtonInput<MouseButton>,
    touches: &Touches,
    cursor: Option<Vec2>,
) -> Option<Vec2> {
    if touches.iter().count() == 1 {
        return touches.iter_just_pressed().next().map(|touch| touch.position());
    }
    if mouse_button.just_pressed(MouseButton::Left) {
        return cursor;
    }
    None
}

/// System: on press, report the nearest surface under the pointer
pub fn pick_part_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    assemblies: Query<&ExplodeAssembly>,
    bounds_query: Query<(&Aabb, &GlobalTransform)>,
    mut selections: EventWriter<PartSelected>,
) {
    let cursor = window_query.single().ok().and_then(|w| w.cursor_position());
    let Some(screen_position) = press_position(&mouse_button, &touches, cursor) else { return };
    let Ok((camera, camera_transform)) = camera_query.single() else { return };
    let Ok(ray) = camera.viewport_to_world(camera_transform, screen_position) else { return };

    let candidates = assemblies
        .iter()
        .flat_map(|assembly| assembly.registry.surface_entities())
        .filter_map(|surface| {
            bounds_query
                .get(surface)
                .ok()
                .map(|(aabb, global)| (surface, Bounds::from_local_aabb(aabb, global)))
        });

    if let Some(node) = pick_nearest(ray.origin, *ray.direction, candidates) {
        debug!("Picked {:?}", node);
        selections.write(PartSelected { node });
    }
}
