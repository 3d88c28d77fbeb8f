// Explode command intake, animation ticking and scene sync
use bevy::prelude::*;
use bevy::pbr::NotShadowCaster;
use bevy::render::primitives::Aabb;

use crate::constants::OUTLINE_HULL_SCALE;
use crate::types::*;
use super::assembly::{ExplodeAssembly, OverlaySlot};
use super::bounds::surfaces_bounds;
use super::label::{despawn_label, label_anchor, label_facing, spawn_label, LabelAssets};

/// System: mode gate command. Does not collapse a part left exploded.
pub fn apply_mode_commands(
    mut mode_events: EventReader<SetExplodeMode>,
    mut mode: ResMut<ExplodeMode>,
) {
    for SetExplodeMode(active) in mode_events.read() {
        if mode.active != *active {
            mode.active = *active;
            info!("Explode-parts mode {}", if *active { "ON" } else { "OFF (hinge mode)" });
        }
    }
}

/// System: route part picks through the mode gate to the single-part engine or the hinge animator
pub fn route_part_selection(
    mut commands: Commands,
    mut label_assets: LabelAssets,
    mut selections: EventReader<PartSelected>,
    mut hinge_requests: EventWriter<HingeToggleRequested>,
    mode: Res<ExplodeMode>,
    mut assemblies: Query<(Entity, &mut ExplodeAssembly)>,
    hierarchy: Query<&ChildOf>,
    bounds_query: Query<(&Aabb, &GlobalTransform)>,
    global_query: Query<&GlobalTransform>,
    camera_query: Query<&GlobalTransform, With<Camera3d>>,
) {
    for selection in selections.read() {
        for (assembly_entity, mut assembly) in assemblies.iter_mut() {
            let Some(part) = assembly.registry.resolve_root(selection.node, &hierarchy) else {
                continue;
            };

            if !mode.active {
                let name = assembly.registry.part(part).map(|p| p.name.clone()).unwrap_or_default();
                debug!("Hinge mode: forwarding '{}'", name);
                hinge_requests.write(HingeToggleRequested { assembly: assembly_entity, part, name });
                break;
            }

            let ExplodeAssembly {
                registry,
                materials,
                ghost,
                single,
                full,
                label_template,
                part_lift_distance,
                label_height,
            } = &mut *assembly;

            let (Some(single), Some(ghost)) = (single.as_mut(), ghost.as_ref()) else {
                debug!("Single-part explode is disabled for {:?}", assembly_entity);
                break;
            };
            if full.as_ref().is_some_and(|full| !full.is_collapsed()) {
                debug!("Ignoring part tap while the full assembly is exploded");
                break;
            }

            let activation = single.activate(selection.node, registry, &hierarchy, materials, ghost);
            if let Some(label) = activation.despawn_label {
                despawn_label(&mut commands, label);
            }

            let Some(exploded) = activation.exploded else { break };
            let Some(template) = label_template.as_ref() else { break };
            let Some(record) = registry.part(exploded) else { break };

            // Transforms have not propagated the lift yet: anchor from the collapsed
            // bounds and add the lift in world space
            let center = surfaces_bounds(&record.surfaces, &bounds_query)
                .map(|b| b.center())
                .or_else(|| global_query.get(exploded).ok().map(|g| g.translation()))
                .unwrap_or_default();
            let lift_world = global_query
                .get(registry.root())
                .map(|g| g.affine().transform_vector3(Vec3::Y * *part_lift_distance))
                .unwrap_or(Vec3::Y * *part_lift_distance);
            let position = label_anchor(center, lift_world, *label_height);
            let rotation = camera_query
                .single()
                .map(|camera| label_facing(position, camera.translation()))
                .unwrap_or(Quat::IDENTITY);

            let label = spawn_label(&mut commands, &mut label_assets, template, &record.name, position, rotation);
            single.attach_label(exploded, label);
            break;
        }
    }
}

/// System: full-explode command. Collapses a single-part explosion first so both
/// engines never drive the same offsets.
pub fn route_full_explode_toggle(
    mut commands: Commands,
    mut toggles: EventReader<ToggleFullExplode>,
    mut assemblies: Query<(Entity, &mut ExplodeAssembly)>,
) {
    for _ in toggles.read() {
        for (assembly_entity, mut assembly) in assemblies.iter_mut() {
            let ExplodeAssembly { registry, materials, ghost, single, full, .. } = &mut *assembly;
            let (Some(full), Some(ghost)) = (full.as_mut(), ghost.as_ref()) else {
                debug!("Full explode is disabled for {:?}", assembly_entity);
                continue;
            };

            if let Some(single) = single.as_mut() {
                if let Some((_, Some(label))) = single.collapse(registry, materials) {
                    despawn_label(&mut commands, label);
                }
            }
            full.toggle(registry, materials, ghost);
        }
    }
}

/// System: advance in-flight full-assembly animations
pub fn tick_full_explode(
    time: Res<Time>,
    mut assemblies: Query<&mut ExplodeAssembly>,
) {
    let dt = time.delta_secs();
    for mut assembly in assemblies.iter_mut() {
        let ExplodeAssembly { registry, materials, full, .. } = &mut *assembly;
        if let Some(full) = full.as_mut() {
            full.tick(dt, registry, materials);
        }
    }
}

/// System: mirror displayed part offsets into transforms
pub fn sync_part_offsets(
    assemblies: Query<&ExplodeAssembly>,
    mut transforms: Query<&mut Transform>,
) {
    for assembly in assemblies.iter() {
        for part in assembly.registry.parts() {
            let Ok(mut transform) = transforms.get_mut(part.entity) else { continue };
            if transform.translation != part.offset() {
                transform.translation = part.offset();
            }
        }
    }
}

/// System: mirror changed appearance sequences into materials and overlay slots
pub fn sync_surface_materials(
    mut commands: Commands,
    mut assemblies: Query<&mut ExplodeAssembly>,
    mut surface_query: Query<(&mut MeshMaterial3d<StandardMaterial>, &Mesh3d), Without<OverlaySlot>>,
    overlay_query: Query<(Entity, &OverlaySlot)>,
) {
    for mut assembly in assemblies.iter_mut() {
        let dirty = assembly.materials.take_dirty();
        if dirty.is_empty() {
            continue;
        }
        debug!("Updating materials on {} surfaces", dirty.len());

        for surface in dirty {
            let Some(slots) = assembly.materials.current(surface) else { continue };
            let Ok((mut material, mesh)) = surface_query.get_mut(surface) else { continue };

            if let Some(first) = slots.first() {
                material.0 = first.clone();
            }

            for (overlay, slot) in overlay_query.iter() {
                if slot.surface == surface {
                    commands.entity(overlay).despawn();
                }
            }
            for extra in slots.iter().skip(1) {
                commands.spawn((
                    Mesh3d(mesh.0.clone()),
                    MeshMaterial3d(extra.clone()),
                    Transform::from_scale(Vec3::splat(OUTLINE_HULL_SCALE)),
                    NotShadowCaster,
                    OverlaySlot { surface },
                    ChildOf(surface),
                ));
            }
        }
    }
}
