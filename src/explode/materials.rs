// Material state cache - original appearance snapshots and ghost/restore swaps
use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::config::GhostStyle;

#[derive(Debug, Clone)]
struct SurfaceSlots<M> {
    original: Vec<M>,
    current: Vec<M>,
}

/// Per-assembly appearance table.
///
/// Every write goes through here; the ECS side only mirrors `current` for
/// surfaces reported by [`MaterialCache::take_dirty`].
#[derive(Debug, Clone)]
pub struct MaterialCache<M> {
    surfaces: HashMap<Entity, SurfaceSlots<M>>,
    dirty: HashSet<Entity>,
}

impl<M> Default for MaterialCache<M> {
    fn default() -> Self {
        Self {
            surfaces: HashMap::new(),
            dirty: HashSet::new(),
        }
    }
}

impl<M: Clone + PartialEq> MaterialCache<M> {
    /// Records the original appearance of a surface. A second snapshot of the
    /// same surface is refused so the baseline can never be overwritten.
    pub fn snapshot(&mut self, surface: Entity, slots: Vec<M>) -> bool {
        if self.surfaces.contains_key(&surface) {
            warn!("Surface {:?} already snapshotted, keeping original appearance", surface);
            return false;
        }
        self.surfaces.insert(
            surface,
            SurfaceSlots {
                original: slots.clone(),
                current: slots,
            },
        );
        true
    }

    pub fn snapshot_all(&mut self, surfaces: impl IntoIterator<Item = (Entity, Vec<M>)>) -> usize {
        surfaces
            .into_iter()
            .filter(|(surface, slots)| self.snapshot(*surface, slots.clone()))
            .count()
    }

    pub fn ghost(&mut self, surfaces: impl IntoIterator<Item = Entity>, style: &GhostStyle<M>) {
        let slots = style.slots();
        for surface in surfaces {
            self.set_current(surface, |_| slots.clone());
        }
    }

    pub fn restore(&mut self, surfaces: impl IntoIterator<Item = Entity>) {
        for surface in surfaces {
            self.set_current(surface, |entry| entry.original.clone());
        }
    }

    pub fn restore_all(&mut self) {
        let all: Vec<Entity> = self.surfaces.keys().copied().collect();
        self.restore(all);
    }

    #[cfg(test)]
    pub fn original(&self, surface: Entity) -> Option<&[M]> {
        self.surfaces.get(&surface).map(|s| s.original.as_slice())
    }

    pub fn current(&self, surface: Entity) -> Option<&[M]> {
        self.surfaces.get(&surface).map(|s| s.current.as_slice())
    }

    #[cfg(test)]
    pub fn is_ghosted(&self, surface: Entity) -> bool {
        self.surfaces
            .get(&surface)
            .is_some_and(|s| s.current != s.original)
    }

    /// Surfaces whose current appearance changed since the last call
    pub fn take_dirty(&mut self) -> Vec<Entity> {
        self.dirty.drain().collect()
    }

    fn set_current(&mut self, surface: Entity, next: impl FnOnce(&SurfaceSlots<M>) -> Vec<M>) {
        let Some(entry) = self.surfaces.get_mut(&surface) else {
            debug!("Surface {:?} was never snapshotted", surface);
            return;
        };
        let slots = next(entry);
        if entry.current != slots {
            entry.current = slots;
            self.dirty.insert(surface);
        }
    }
}
