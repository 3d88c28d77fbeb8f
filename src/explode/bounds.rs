// Axis-aligned world bounds for renderable surfaces
use bevy::prelude::*;
use bevy::render::primitives::Aabb;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    /// World-space box enclosing a mesh-local AABB under a global transform
    pub fn from_local_aabb(aabb: &Aabb, transform: &GlobalTransform) -> Self {
        let center = Vec3::from(aabb.center);
        let half = Vec3::from(aabb.half_extents);

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let sign = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            let corner = transform.transform_point(center + half * sign);
            min = min.min(corner);
            max = max.max(corner);
        }
        Self::new(min, max)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn encapsulate(&mut self, other: &Bounds) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Union of all boxes, `None` for an empty set
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a Bounds>) -> Option<Bounds> {
        let mut iter = boxes.into_iter();
        let mut total = *iter.next()?;
        for b in iter {
            total.encapsulate(b);
        }
        Some(total)
    }
}

/// World bounds of a set of surfaces, skipping surfaces whose bounds are not known yet
pub fn surfaces_bounds(
    surfaces: &[Entity],
    surface_query: &Query<(&Aabb, &GlobalTransform)>,
) -> Option<Bounds> {
    let boxes: Vec<Bounds> = surfaces
        .iter()
        .filter_map(|&surface| surface_query.get(surface).ok())
        .map(|(aabb, transform)| Bounds::from_local_aabb(aabb, transform))
        .collect();
    Bounds::enclosing(&boxes)
}
