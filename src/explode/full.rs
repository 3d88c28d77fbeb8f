// Full-assembly explode engine - radial explode/collapse of every hinge group from a shared pivot
use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::config::GhostStyle;
use super::materials::MaterialCache;
use super::registry::PartRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Outward,
    Inward,
}

impl Heading {
    pub fn opposite(self) -> Self {
        match self {
            Heading::Outward => Heading::Inward,
            Heading::Inward => Heading::Outward,
        }
    }
}

/// In-flight animation. Replacing it is how an animation is cancelled.
#[derive(Debug, Clone)]
pub struct Tween {
    pub heading: Heading,
    elapsed: f32,
    /// Offsets displayed when the animation started
    from: Vec<(Entity, Vec3)>,
}

#[derive(Debug, Clone, Default)]
pub enum FullExplodePhase {
    #[default]
    Collapsed,
    Animating(Tween),
    Exploded,
}

impl FullExplodePhase {
    pub fn label(&self) -> &'static str {
        match self {
            FullExplodePhase::Collapsed => "collapsed",
            FullExplodePhase::Animating(Tween { heading: Heading::Outward, .. }) => "exploding",
            FullExplodePhase::Animating(Tween { heading: Heading::Inward, .. }) => "collapsing",
            FullExplodePhase::Exploded => "exploded",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FullExplode {
    distance: f32,
    duration: f32,
    phase: FullExplodePhase,
}

/// Assigns each part its radial direction, once.
///
/// `centers` holds world-space bounds centers per part; parts without an entry
/// get no direction and never move. `to_local` rotates world directions into
/// the assembly's frame. A center that coincides with the pivot yields a zero
/// direction.
pub fn assign_directions(
    registry: &mut PartRegistry,
    pivot_world: Vec3,
    to_local: Quat,
    centers: &HashMap<Entity, Vec3>,
) {
    for part in registry.parts_mut() {
        part.direction = centers
            .get(&part.entity)
            .map(|center| to_local * (*center - pivot_world).normalize_or_zero());
        if part.direction.is_none() {
            debug!("Part '{}' has no surfaces, it will not move on full explode", part.name);
        }
    }
}

impl FullExplode {
    pub fn new(distance: f32, duration: f32) -> Self {
        Self {
            distance,
            duration,
            phase: FullExplodePhase::Collapsed,
        }
    }

    pub fn phase(&self) -> &FullExplodePhase {
        &self.phase
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self.phase, FullExplodePhase::Collapsed)
    }

    /// Explode extent of the running animation: rises toward 1 while exploding,
    /// falls toward 0 while collapsing
    pub fn fraction(&self) -> Option<f32> {
        let FullExplodePhase::Animating(tween) = &self.phase else {
            return None;
        };
        let played = tween.elapsed / self.duration;
        Some(match tween.heading {
            Heading::Outward => played,
            Heading::Inward => 1.0 - played,
        })
    }

    /// Cancel whatever is playing and head the other way from the displayed offsets
    pub fn toggle<M: Clone + PartialEq>(
        &mut self,
        registry: &PartRegistry,
        materials: &mut MaterialCache<M>,
        ghost: &GhostStyle<M>,
    ) -> Heading {
        let heading = match &self.phase {
            FullExplodePhase::Collapsed => Heading::Outward,
            FullExplodePhase::Exploded => Heading::Inward,
            FullExplodePhase::Animating(tween) => tween.heading.opposite(),
        };

        if heading == Heading::Outward {
            // Surfaces not hanging directly off a moving hinge stay put, ghosted
            let directed: HashSet<Entity> = registry
                .parts()
                .iter()
                .filter(|p| p.direction.is_some())
                .map(|p| p.entity)
                .collect();
            let unrelated = registry
                .surfaces()
                .iter()
                .filter(|s| !s.parent.is_some_and(|parent| directed.contains(&parent)))
                .map(|s| s.entity);
            materials.ghost(unrelated, ghost);
        }

        let from = registry
            .parts()
            .iter()
            .filter(|p| p.direction.is_some())
            .map(|p| (p.entity, p.offset()))
            .collect();
        self.phase = FullExplodePhase::Animating(Tween { heading, elapsed: 0.0, from });
        info!("💥 Full explode: {}", self.phase.label());
        heading
    }

    /// Advance the animation by `dt` seconds. Returns true on the tick it completes.
    pub fn tick<M: Clone + PartialEq>(
        &mut self,
        dt: f32,
        registry: &mut PartRegistry,
        materials: &mut MaterialCache<M>,
    ) -> bool {
        let FullExplodePhase::Animating(tween) = &mut self.phase else {
            return false;
        };

        tween.elapsed = (tween.elapsed + dt).min(self.duration);
        let heading = tween.heading;

        if tween.elapsed >= self.duration {
            // Snap exact endpoints
            for part in registry.parts_mut() {
                if let Some(direction) = part.direction {
                    let end = endpoint(part.original_offset(), direction, self.distance, heading);
                    part.set_offset(end);
                }
            }
            self.phase = match heading {
                Heading::Outward => FullExplodePhase::Exploded,
                Heading::Inward => {
                    materials.restore_all();
                    FullExplodePhase::Collapsed
                }
            };
            info!("Full explode: {}", self.phase.label());
            return true;
        }

        let t = tween.elapsed / self.duration;
        for &(entity, from) in &tween.from {
            let Some(part) = registry.part_mut(entity) else { continue };
            let Some(direction) = part.direction else { continue };
            let to = endpoint(part.original_offset(), direction, self.distance, heading);
            part.set_offset(from.lerp(to, t));
        }
        false
    }
}

fn endpoint(original: Vec3, direction: Vec3, distance: f32, heading: Heading) -> Vec3 {
    match heading {
        Heading::Outward => original + direction * distance,
        Heading::Inward => original,
    }
}
