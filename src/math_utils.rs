use bevy::prelude::*;

/// Ray-plane intersection against the horizontal plane `y = plane_y`
/// Returns the hit point if the plane is in front of the ray origin
pub fn ray_ground_intersection(
    ray_origin: Vec3,
    ray_direction: Vec3,
    plane_y: f32,
) -> Option<Vec3> {
    // Ray is parallel to the plane, no intersection
    if ray_direction.y.abs() < 0.0001 {
        return None;
    }

    let t = (plane_y - ray_origin.y) / ray_direction.y;
    if t > 0.0 {
        Some(ray_origin + ray_direction * t)
    } else {
        // Plane is behind the ray origin
        None
    }
}

/// Ray-AABB intersection test (slab method)
/// Returns the distance along the ray to the entry point, or to the exit point
/// when the origin is inside the box
pub fn ray_aabb_intersection(
    ray_origin: Vec3,
    ray_direction: Vec3,
    box_min: Vec3,
    box_max: Vec3,
) -> Option<f32> {
    let inv = ray_direction.recip();
    let t1 = (box_min - ray_origin) * inv;
    let t2 = (box_max - ray_origin) * inv;

    // NaN from 0 * inf on a degenerate axis is dropped by min/max
    let t_near = t1.min(t2).max_element();
    let t_far = t1.max(t2).min_element();

    if t_far < 0.0 || t_near > t_far {
        return None;
    }

    if t_near >= 0.0 {
        Some(t_near)
    } else {
        Some(t_far)
    }
}
