// Explode module - per-part and full-assembly exploded views of a vehicle hierarchy
//
// Submodules:
// - bounds: World-space bounds of renderable surfaces
// - registry: Explodable parts, their surfaces, descendant -> part lookup
// - materials: Original appearance snapshots, ghost/restore
// - single: Single-part lift engine
// - full: Full-assembly radial explode engine
// - label: Spawn-time oriented part labels with the name rendered into their texture
// - assembly: Per-instance state and initialization
// - systems: Command routing, ticking, scene sync

mod bounds;
mod registry;
mod materials;
mod single;
mod full;
mod label;
mod assembly;
mod systems;

use bevy::prelude::*;

use crate::types::*;

pub use assembly::{ExplodeAssembly, ExplodeController};
pub use full::FullExplodePhase;
pub use bounds::Bounds;

pub struct ExplodePlugin;

impl Plugin for ExplodePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ExplodeMode>()
            .add_event::<SetExplodeMode>()
            .add_event::<ToggleFullExplode>()
            .add_event::<PartSelected>()
            .add_event::<HingeToggleRequested>()
            .add_systems(
                Update,
                (
                    assembly::initialize_assemblies,
                    systems::apply_mode_commands,
                    systems::route_part_selection,
                    systems::route_full_explode_toggle,
                    systems::tick_full_explode,
                    systems::sync_part_offsets,
                    systems::sync_surface_materials,
                )
                    .chain(),
            );
    }
}
