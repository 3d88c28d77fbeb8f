// Part registry - explodable hinge groups under an assembly root and the surfaces they own
use bevy::prelude::*;
use std::collections::HashMap;

/// Parent lookup over a scene hierarchy
pub trait Hierarchy {
    fn parent(&self, entity: Entity) -> Option<Entity>;
}

impl Hierarchy for Query<'_, '_, &ChildOf> {
    fn parent(&self, entity: Entity) -> Option<Entity> {
        self.get(entity).ok().map(|child_of| child_of.parent())
    }
}

impl Hierarchy for HashMap<Entity, Entity> {
    fn parent(&self, entity: Entity) -> Option<Entity> {
        self.get(&entity).copied()
    }
}

/// A direct child of the assembly root that can be displaced on its own
#[derive(Debug, Clone)]
pub struct ExplodablePart {
    pub entity: Entity,
    pub name: String,
    original_offset: Vec3,
    offset: Vec3,
    pub surfaces: Vec<Entity>,
    /// Unit direction in the assembly's local frame, set once by the full-assembly engine
    pub direction: Option<Vec3>,
}

impl ExplodablePart {
    pub fn new(entity: Entity, name: impl Into<String>, original_offset: Vec3) -> Self {
        Self {
            entity,
            name: name.into(),
            original_offset,
            offset: original_offset,
            surfaces: Vec::new(),
            direction: None,
        }
    }

    /// Local offset captured at registration. Read-only for the lifetime of the part.
    pub fn original_offset(&self) -> Vec3 {
        self.original_offset
    }

    /// Local offset currently displayed
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    pub fn reset_offset(&mut self) {
        self.offset = self.original_offset;
    }

    pub fn displacement(&self) -> f32 {
        self.offset.distance(self.original_offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRecord {
    pub entity: Entity,
    /// Explodable root owning this surface, `None` under a non-explodable bucket
    pub part: Option<Entity>,
    /// Direct parent in the hierarchy
    pub parent: Option<Entity>,
}

#[derive(Debug, Clone)]
pub struct PartRegistry {
    root: Entity,
    parts: Vec<ExplodablePart>,
    index: HashMap<Entity, usize>,
    surfaces: Vec<SurfaceRecord>,
}

impl PartRegistry {
    /// Builds the registry once.
    ///
    /// `children` are the direct children of `root` as `(entity, name, local offset)`.
    /// `candidate_surfaces` may contain meshes from anywhere in the world; only
    /// those below `root` are kept.
    pub fn build<'a>(
        root: Entity,
        children: impl IntoIterator<Item = (Entity, &'a str, Vec3)>,
        candidate_surfaces: impl IntoIterator<Item = Entity>,
        hierarchy: &impl Hierarchy,
        is_non_explodable: impl Fn(&str) -> bool,
    ) -> Self {
        let mut parts = Vec::new();
        let mut index = HashMap::new();

        for (entity, name, offset) in children {
            if is_non_explodable(name) {
                debug!("Skipping non-explodable group '{}'", name);
                continue;
            }
            index.insert(entity, parts.len());
            parts.push(ExplodablePart::new(entity, name, offset));
        }

        let mut surfaces = Vec::new();
        for surface in candidate_surfaces {
            // Walk up to the root, remembering the node directly below it
            let mut below_root = surface;
            let mut current = hierarchy.parent(surface);
            let mut under_root = false;
            while let Some(node) = current {
                if node == root {
                    under_root = true;
                    break;
                }
                below_root = node;
                current = hierarchy.parent(node);
            }
            if !under_root {
                continue;
            }

            let part = index.get(&below_root).map(|&i| {
                parts[i].surfaces.push(surface);
                parts[i].entity
            });
            surfaces.push(SurfaceRecord {
                entity: surface,
                part,
                parent: hierarchy.parent(surface),
            });
        }

        Self { root, parts, index, surfaces }
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    /// Walks ancestors of `node` until a registered part is found
    pub fn resolve_root(&self, node: Entity, hierarchy: &impl Hierarchy) -> Option<Entity> {
        let mut current = Some(node);
        while let Some(entity) = current {
            if self.index.contains_key(&entity) {
                return Some(entity);
            }
            if entity == self.root {
                return None;
            }
            current = hierarchy.parent(entity);
        }
        None
    }

    pub fn part(&self, entity: Entity) -> Option<&ExplodablePart> {
        self.index.get(&entity).map(|&i| &self.parts[i])
    }

    pub fn part_mut(&mut self, entity: Entity) -> Option<&mut ExplodablePart> {
        self.index.get(&entity).map(|&i| &mut self.parts[i])
    }

    pub fn parts(&self) -> &[ExplodablePart] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut [ExplodablePart] {
        &mut self.parts
    }

    pub fn surfaces(&self) -> &[SurfaceRecord] {
        &self.surfaces
    }

    pub fn surface_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.surfaces.iter().map(|s| s.entity)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn e(n: u32) -> Entity {
        Entity::from_raw(n)
    }

    /// root(1)
    ///  ├─ Hood_Hinge(2) ─ Hood(3) ─ HoodBadge(4)
    ///  ├─ Trunk_Hinge(5) ─ Trunk(6)
    ///  └─ Other(7) ─ Chassis(8)
    /// Ground(9) is not under the root
    pub(crate) fn vehicle() -> (PartRegistry, HashMap<Entity, Entity>) {
        let hierarchy: HashMap<Entity, Entity> = [
            (e(2), e(1)),
            (e(3), e(2)),
            (e(4), e(3)),
            (e(5), e(1)),
            (e(6), e(5)),
            (e(7), e(1)),
            (e(8), e(7)),
        ]
        .into_iter()
        .collect();

        let registry = PartRegistry::build(
            e(1),
            [
                (e(2), "Hood_Hinge", Vec3::new(0.0, 0.5, 1.0)),
                (e(5), "Trunk_Hinge", Vec3::new(0.0, 0.5, -1.0)),
                (e(7), "Other", Vec3::ZERO),
            ],
            [e(3), e(4), e(6), e(8), e(9)],
            &hierarchy,
            |name| name == "Other",
        );
        (registry, hierarchy)
    }

    #[test]
    fn registers_direct_children_except_excluded() {
        let (registry, _) = vehicle();
        let names: Vec<&str> = registry.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Hood_Hinge", "Trunk_Hinge"]);
        assert_eq!(registry.part(e(2)).unwrap().original_offset(), Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn surfaces_are_grouped_by_part() {
        let (registry, _) = vehicle();
        assert_eq!(registry.part(e(2)).unwrap().surfaces, vec![e(3), e(4)]);
        assert_eq!(registry.part(e(5)).unwrap().surfaces, vec![e(6)]);
    }

    #[test]
    fn surfaces_outside_root_are_ignored() {
        let (registry, _) = vehicle();
        let all: Vec<Entity> = registry.surface_entities().collect();
        assert_eq!(all, vec![e(3), e(4), e(6), e(8)]);
    }

    #[test]
    fn bucket_surfaces_have_no_part() {
        let (registry, _) = vehicle();
        let chassis = registry.surfaces().iter().find(|s| s.entity == e(8)).unwrap();
        assert_eq!(chassis.part, None);
        assert_eq!(chassis.parent, Some(e(7)));
    }

    #[test]
    fn resolve_from_nested_descendant() {
        let (registry, hierarchy) = vehicle();
        assert_eq!(registry.resolve_root(e(4), &hierarchy), Some(e(2)));
        assert_eq!(registry.resolve_root(e(2), &hierarchy), Some(e(2)));
        assert_eq!(registry.resolve_root(e(6), &hierarchy), Some(e(5)));
    }

    #[test]
    fn resolve_unrelated_nodes_is_none() {
        let (registry, hierarchy) = vehicle();
        assert_eq!(registry.resolve_root(e(9), &hierarchy), None);
        assert_eq!(registry.resolve_root(e(8), &hierarchy), None);
        assert_eq!(registry.resolve_root(e(1), &hierarchy), None);
        assert_eq!(registry.resolve_root(e(42), &hierarchy), None);
    }

    #[test]
    fn offsets_start_at_original() {
        let (mut registry, _) = vehicle();
        let part = registry.part_mut(e(2)).unwrap();
        assert_eq!(part.offset(), part.original_offset());
        part.set_offset(Vec3::ONE);
        assert!(part.displacement() > 0.0);
        part.reset_offset();
        assert_eq!(part.offset(), Vec3::new(0.0, 0.5, 1.0));
    }
}
