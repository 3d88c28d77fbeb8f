// Single-part explode engine - lift one tapped part, ghost everything else
use bevy::prelude::*;

use crate::config::GhostStyle;
use super::materials::MaterialCache;
use super::registry::{Hierarchy, PartRegistry};

/// Entities making up a spawned name label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEntities {
    pub plate: Entity,
    /// Offscreen camera drawing the name into the plate texture
    pub camera: Entity,
    pub text: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Collapsed,
    Exploded {
        part: Entity,
        label: Option<LabelEntities>,
    },
}

/// What an activation changed, for the caller to mirror in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Activation {
    pub collapsed: Option<Entity>,
    pub despawn_label: Option<LabelEntities>,
    pub exploded: Option<Entity>,
}

#[derive(Debug, Clone)]
pub struct SingleExplode {
    lift: f32,
    state: SessionState,
}

impl SingleExplode {
    pub fn new(lift: f32) -> Self {
        Self {
            lift,
            state: SessionState::Collapsed,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active_part(&self) -> Option<Entity> {
        match self.state {
            SessionState::Exploded { part, .. } => Some(part),
            SessionState::Collapsed => None,
        }
    }

    /// Toggle the explodable part owning `clicked`. Unresolved nodes are ignored.
    pub fn activate<M: Clone + PartialEq>(
        &mut self,
        clicked: Entity,
        registry: &mut PartRegistry,
        hierarchy: &impl Hierarchy,
        materials: &mut MaterialCache<M>,
        ghost: &GhostStyle<M>,
    ) -> Activation {
        let Some(part) = registry.resolve_root(clicked, hierarchy) else {
            return Activation::default();
        };

        let mut activation = Activation::default();
        if let SessionState::Exploded { part: active, .. } = self.state {
            let (collapsed, label) = self.collapse(registry, materials).unzip();
            activation.collapsed = collapsed;
            activation.despawn_label = label.flatten();
            if active == part {
                return activation;
            }
        }

        self.explode(part, registry, materials, ghost);
        activation.exploded = Some(part);
        activation
    }

    /// Put the active part back and restore every surface
    pub fn collapse<M: Clone + PartialEq>(
        &mut self,
        registry: &mut PartRegistry,
        materials: &mut MaterialCache<M>,
    ) -> Option<(Entity, Option<LabelEntities>)> {
        let SessionState::Exploded { part, label } = std::mem::take(&mut self.state) else {
            return None;
        };

        if let Some(record) = registry.part_mut(part) {
            record.reset_offset();
            info!("Collapsed part '{}'", record.name);
        }
        materials.restore_all();
        Some((part, label))
    }

    /// Record the label spawned for `part`. Returns false if `part` is no longer active.
    pub fn attach_label(&mut self, part: Entity, entities: LabelEntities) -> bool {
        match &mut self.state {
            SessionState::Exploded { part: active, label } if *active == part => {
                *label = Some(entities);
                true
            }
            _ => false,
        }
    }

    fn explode<M: Clone + PartialEq>(
        &mut self,
        part: Entity,
        registry: &mut PartRegistry,
        materials: &mut MaterialCache<M>,
        ghost: &GhostStyle<M>,
    ) {
        let Some(record) = registry.part_mut(part) else { return };
        record.set_offset(record.original_offset() + Vec3::Y * self.lift);
        let own_surfaces = record.surfaces.clone();
        info!("Exploded part '{}'", record.name);

        let others: Vec<Entity> = registry
            .surfaces()
            .iter()
            .filter(|surface| surface.part != Some(part))
            .map(|surface| surface.entity)
            .collect();
        materials.restore(own_surfaces);
        materials.ghost(others, ghost);

        self.state = SessionState::Exploded { part, label: None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explode::registry::tests::{e, vehicle};

    const GHOST: GhostStyle<u32> = GhostStyle { ghost: 100, outline: Some(101) };
    const HOOD_HINGE: u32 = 2;
    const TRUNK_HINGE: u32 = 5;

    fn fixture() -> (SingleExplode, PartRegistry, std::collections::HashMap<Entity, Entity>, MaterialCache<u32>) {
        let (registry, hierarchy) = vehicle();
        let mut materials = MaterialCache::default();
        materials.snapshot_all(registry.surface_entities().map(|s| (s, vec![s.index()])));
        materials.take_dirty();
        (SingleExplode::new(0.1), registry, hierarchy, materials)
    }

    fn labels() -> LabelEntities {
        LabelEntities { plate: e(50), camera: e(52), text: e(51) }
    }

    #[test]
    fn tap_lifts_part_and_ghosts_others() {
        let (mut engine, mut registry, hierarchy, mut materials) = fixture();
        // Tap the nested badge under the hood
        let activation = engine.activate(e(4), &mut registry, &hierarchy, &mut materials, &GHOST);
        assert_eq!(activation.exploded, Some(e(HOOD_HINGE)));
        assert_eq!(activation.collapsed, None);

        let hood = registry.part(e(HOOD_HINGE)).unwrap();
        assert_eq!(hood.offset(), hood.original_offset() + Vec3::Y * 0.1);
        assert!(!materials.is_ghosted(e(3)));
        assert!(!materials.is_ghosted(e(4)));
        assert_eq!(materials.current(e(6)), Some(&[100u32, 101][..]));
        assert_eq!(materials.current(e(8)), Some(&[100u32, 101][..]));
    }

    #[test]
    fn unresolved_tap_is_noop() {
        let (mut engine, mut registry, hierarchy, mut materials) = fixture();
        let activation = engine.activate(e(9), &mut registry, &hierarchy, &mut materials, &GHOST);
        assert_eq!(activation, Activation::default());
        assert_eq!(engine.state(), SessionState::Collapsed);
        assert!(materials.take_dirty().is_empty());
    }

    #[test]
    fn tapping_same_part_twice_round_trips() {
        let (mut engine, mut registry, hierarchy, mut materials) = fixture();
        let original = registry.part(e(HOOD_HINGE)).unwrap().original_offset();

        engine.activate(e(3), &mut registry, &hierarchy, &mut materials, &GHOST);
        assert!(engine.attach_label(e(HOOD_HINGE), labels()));

        let activation = engine.activate(e(3), &mut registry, &hierarchy, &mut materials, &GHOST);
        assert_eq!(activation.collapsed, Some(e(HOOD_HINGE)));
        assert_eq!(activation.despawn_label, Some(labels()));
        assert_eq!(activation.exploded, None);
        assert_eq!(engine.state(), SessionState::Collapsed);

        // Bit-for-bit return to the cached original
        let hood = registry.part(e(HOOD_HINGE)).unwrap();
        assert_eq!(hood.offset().to_array().map(f32::to_bits), original.to_array().map(f32::to_bits));
        for surface in registry.surface_entities() {
            assert!(!materials.is_ghosted(surface));
        }
    }

    #[test]
    fn tapping_another_part_collapses_previous_first() {
        let (mut engine, mut registry, hierarchy, mut materials) = fixture();
        engine.activate(e(3), &mut registry, &hierarchy, &mut materials, &GHOST);
        engine.attach_label(e(HOOD_HINGE), labels());

        let activation = engine.activate(e(6), &mut registry, &hierarchy, &mut materials, &GHOST);
        assert_eq!(activation.collapsed, Some(e(HOOD_HINGE)));
        assert_eq!(activation.despawn_label, Some(labels()));
        assert_eq!(activation.exploded, Some(e(TRUNK_HINGE)));
        assert_eq!(engine.active_part(), Some(e(TRUNK_HINGE)));

        let hood = registry.part(e(HOOD_HINGE)).unwrap();
        assert_eq!(hood.offset(), hood.original_offset());
        // Hood surfaces are now ghosted because the trunk is the focus
        assert!(materials.is_ghosted(e(3)));
        assert!(!materials.is_ghosted(e(6)));

        let displaced = registry.parts().iter().filter(|p| p.displacement() > 0.0).count();
        assert_eq!(displaced, 1);
    }

    #[test]
    fn stale_label_is_not_attached() {
        let (mut engine, mut registry, hierarchy, mut materials) = fixture();
        engine.activate(e(3), &mut registry, &hierarchy, &mut materials, &GHOST);
        assert!(!engine.attach_label(e(TRUNK_HINGE), labels()));
    }

    #[test]
    fn collapse_when_collapsed_is_none() {
        let (mut engine, mut registry, _, mut materials) = fixture();
        assert!(engine.collapse(&mut registry, &mut materials).is_none());
    }
}
