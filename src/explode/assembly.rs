// Per-instance explode state and its one-time initialization
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use std::collections::HashMap;

use crate::config::{ExplodeConfig, GhostStyle, LabelTemplate};
use super::bounds::{surfaces_bounds, Bounds};
use super::full::{assign_directions, FullExplode};
use super::label::PartLabelPlate;
use super::materials::MaterialCache;
use super::registry::PartRegistry;
use super::single::SingleExplode;

/// Placed on a vehicle to request explode support for the hierarchy under `body_parts`
#[derive(Component, Clone)]
pub struct ExplodeController {
    /// Container whose direct children are the hinge groups
    pub body_parts: Option<Entity>,
    pub config: ExplodeConfig,
}

/// Marks a controller that could not be initialized; it stays inert
#[derive(Component)]
pub struct ExplodeInitFailed;

/// Extra appearance slot rendered as an overlay copy of a surface's mesh
#[derive(Component)]
pub struct OverlaySlot {
    pub surface: Entity,
}

/// Everything one assembly instance owns. Nothing here is shared between instances.
#[derive(Component)]
pub struct ExplodeAssembly {
    pub registry: PartRegistry,
    pub materials: MaterialCache<Handle<StandardMaterial>>,
    pub ghost: Option<GhostStyle<Handle<StandardMaterial>>>,
    /// `None` when the configuration disabled the engine
    pub single: Option<SingleExplode>,
    pub full: Option<FullExplode>,
    pub label_template: Option<LabelTemplate>,
    pub part_lift_distance: f32,
    pub label_height: f32,
}

impl ExplodeAssembly {
    /// Builds the instance from an already-built registry and the surfaces' original materials
    pub fn new(
        registry: PartRegistry,
        originals: impl IntoIterator<Item = (Entity, Handle<StandardMaterial>)>,
        config: &ExplodeConfig,
    ) -> Self {
        let mut materials = MaterialCache::default();
        let snapshotted = materials.snapshot_all(originals.into_iter().map(|(e, m)| (e, vec![m])));
        debug!("Snapshotted {} surfaces", snapshotted);

        let (single, full) = match config.validate() {
            Ok(()) => (
                Some(SingleExplode::new(config.part_lift_distance)),
                Some(FullExplode::new(config.full_explode_distance, config.full_explode_duration)),
            ),
            Err(err) => {
                error!("Explode disabled for assembly {:?}: {}", registry.root(), err);
                (None, None)
            }
        };

        let label_template = match config.label_template() {
            Ok(template) => Some(template.clone()),
            Err(err) => {
                warn!("Part labels disabled: {}", err);
                None
            }
        };

        Self {
            registry,
            materials,
            ghost: config.ghost_style(),
            single,
            full,
            label_template,
            part_lift_distance: config.part_lift_distance,
            label_height: config.label_height,
        }
    }
}

/// System: build the registry, material snapshot and explosion directions once per controller.
/// Waits until every surface under the container has bounds.
pub fn initialize_assemblies(
    mut commands: Commands,
    pending: Query<(Entity, &ExplodeController), (Without<ExplodeAssembly>, Without<ExplodeInitFailed>)>,
    child_query: Query<(Entity, &ChildOf, &Transform, Option<&Name>)>,
    hierarchy: Query<&ChildOf>,
    surface_query: Query<
        (Entity, &MeshMaterial3d<StandardMaterial>),
        (With<Mesh3d>, Without<OverlaySlot>, Without<PartLabelPlate>),
    >,
    bounds_query: Query<(&Aabb, &GlobalTransform)>,
    global_query: Query<&GlobalTransform>,
) {
    for (controller, explode) in pending.iter() {
        let Some(root) = explode.body_parts.filter(|root| global_query.contains(*root)) else {
            error!("Explode controller {:?} has no body parts container, it stays inactive", controller);
            commands.entity(controller).insert(ExplodeInitFailed);
            continue;
        };

        let mut children: Vec<(Entity, String, Vec3)> = child_query
            .iter()
            .filter(|(_, child_of, _, _)| child_of.parent() == root)
            .map(|(entity, _, transform, name)| {
                let name = name.map(|n| n.as_str().to_string()).unwrap_or_else(|| format!("{entity}"));
                (entity, name, transform.translation)
            })
            .collect();
        children.sort_by_key(|(entity, _, _)| *entity);

        let registry = PartRegistry::build(
            root,
            children.iter().map(|(e, name, offset)| (*e, name.as_str(), *offset)),
            surface_query.iter().map(|(e, _)| e),
            &hierarchy,
            |name| explode.config.is_non_explodable(name),
        );

        if registry.surfaces().iter().any(|s| !bounds_query.contains(s.entity)) {
            debug!("Waiting for surface bounds under {:?}...", root);
            continue;
        }

        let Ok(root_global) = global_query.get(root) else { continue };
        let all_surfaces: Vec<Entity> = registry.surface_entities().collect();

        let pivot_world = explode
            .config
            .pivot_override
            .and_then(|pivot| match global_query.get(pivot) {
                Ok(global) => Some(global.translation()),
                Err(_) => {
                    warn!("Pivot override {:?} has no transform, using bounds center", pivot);
                    None
                }
            })
            .or_else(|| surfaces_bounds(&all_surfaces, &bounds_query).map(|b| b.center()))
            .unwrap_or_else(|| root_global.translation());

        let centers: HashMap<Entity, Vec3> = registry
            .parts()
            .iter()
            .filter_map(|part| {
                surfaces_bounds(&part.surfaces, &bounds_query).map(|b: Bounds| (part.entity, b.center()))
            })
            .collect();

        let (_, root_rotation, _) = root_global.to_scale_rotation_translation();
        let pivot_local = root_global.affine().inverse().transform_point3(pivot_world);

        let mut registry = registry;
        assign_directions(&mut registry, pivot_world, root_rotation.inverse(), &centers);

        let originals: Vec<(Entity, Handle<StandardMaterial>)> = registry
            .surface_entities()
            .filter_map(|e| surface_query.get(e).ok())
            .map(|(e, material)| (e, material.0.clone()))
            .collect();

        info!(
            "🚗 Explode assembly ready: {} parts, {} surfaces, pivot {:?} (local {:?})",
            registry.parts().len(),
            originals.len(),
            pivot_world,
            pivot_local
        );

        let assembly = ExplodeAssembly::new(registry, originals, &explode.config);
        commands.entity(controller).insert(assembly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    /// Vehicle(controller) ─ BodyParts ─┬─ Hood_Hinge ─ Hood
    ///                                  └─ Other ─ Chassis
    fn spawn_vehicle(world: &mut World, config: ExplodeConfig) -> (Entity, Entity, Entity, Entity) {
        let material = Handle::<StandardMaterial>::default();
        let aabb = Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5));

        let vehicle = world.spawn((Transform::default(), GlobalTransform::default())).id();
        let body = world
            .spawn((Transform::default(), GlobalTransform::default(), ChildOf(vehicle), Name::new("BodyParts")))
            .id();
        let hood_hinge = world
            .spawn((
                Transform::from_xyz(0.0, 0.0, 1.0),
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 1.0)),
                ChildOf(body),
                Name::new("Hood_Hinge"),
            ))
            .id();
        let hood = world
            .spawn((
                Mesh3d(Handle::default()),
                MeshMaterial3d(material.clone()),
                aabb,
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 1.0)),
                ChildOf(hood_hinge),
            ))
            .id();
        let other = world
            .spawn((Transform::default(), GlobalTransform::default(), ChildOf(body), Name::new("Other")))
            .id();
        world.spawn((
            Mesh3d(Handle::default()),
            MeshMaterial3d(material),
            aabb,
            GlobalTransform::default(),
            ChildOf(other),
        ));

        world.entity_mut(vehicle).insert(ExplodeController { body_parts: Some(body), config });
        (vehicle, body, hood_hinge, hood)
    }

    fn valid_config() -> ExplodeConfig {
        ExplodeConfig {
            ghost_material: Some(Handle::default()),
            ..default()
        }
    }

    #[test]
    fn builds_assembly_with_directions() {
        let mut world = World::new();
        let (vehicle, body, hood_hinge, hood) = spawn_vehicle(&mut world, valid_config());
        world.run_system_once(initialize_assemblies).unwrap();

        let assembly = world.get::<ExplodeAssembly>(vehicle).expect("assembly initialized");
        assert_eq!(assembly.registry.root(), body);
        assert_eq!(assembly.registry.parts().len(), 1);
        let part = assembly.registry.part(hood_hinge).unwrap();
        assert_eq!(part.surfaces, vec![hood]);
        // Pivot is the center of both surfaces (z = 0.5), hood center is z = 1.0
        assert_eq!(part.direction, Some(Vec3::Z));
        assert!(assembly.single.is_some());
        assert!(assembly.full.is_some());
        assert!(assembly.label_template.is_none());
    }

    #[test]
    fn pivot_override_sets_direction_origin() {
        let mut world = World::new();
        // Off to the side of the hood, level with it
        let pivot = world.spawn(GlobalTransform::from(Transform::from_xyz(1.0, 0.0, 1.0))).id();
        let config = ExplodeConfig { pivot_override: Some(pivot), ..valid_config() };
        let (vehicle, _, hood_hinge, _) = spawn_vehicle(&mut world, config);
        world.run_system_once(initialize_assemblies).unwrap();

        let assembly = world.get::<ExplodeAssembly>(vehicle).unwrap();
        let direction = assembly.registry.part(hood_hinge).unwrap().direction.unwrap();
        assert!((direction - Vec3::NEG_X).length() < 1e-6, "got {direction:?}");
    }

    #[test]
    fn pivot_override_without_transform_uses_bounds_center() {
        let mut world = World::new();
        let pivot = world.spawn(Name::new("Pivot")).id();
        let config = ExplodeConfig { pivot_override: Some(pivot), ..valid_config() };
        let (vehicle, _, hood_hinge, _) = spawn_vehicle(&mut world, config);
        world.run_system_once(initialize_assemblies).unwrap();

        let assembly = world.get::<ExplodeAssembly>(vehicle).unwrap();
        // Same as no override: bounds center z = 0.5, hood center z = 1.0
        assert_eq!(assembly.registry.part(hood_hinge).unwrap().direction, Some(Vec3::Z));
        assert!(assembly.full.is_some());
    }

    #[test]
    fn missing_ghost_disables_engines() {
        let mut world = World::new();
        let (vehicle, ..) = spawn_vehicle(&mut world, ExplodeConfig::default());
        world.run_system_once(initialize_assemblies).unwrap();

        let assembly = world.get::<ExplodeAssembly>(vehicle).unwrap();
        assert!(assembly.single.is_none());
        assert!(assembly.full.is_none());
    }

    #[test]
    fn missing_container_marks_failure() {
        let mut world = World::new();
        let vehicle = world
            .spawn(ExplodeController { body_parts: None, config: valid_config() })
            .id();
        world.run_system_once(initialize_assemblies).unwrap();

        assert!(world.get::<ExplodeInitFailed>(vehicle).is_some());
        assert!(world.get::<ExplodeAssembly>(vehicle).is_none());
    }

    #[test]
    fn waits_for_bounds() {
        let mut world = World::new();
        let (vehicle, _, _, hood) = spawn_vehicle(&mut world, valid_config());
        world.entity_mut(hood).remove::<Aabb>();
        world.run_system_once(initialize_assemblies).unwrap();
        assert!(world.get::<ExplodeAssembly>(vehicle).is_none());
        assert!(world.get::<ExplodeInitFailed>(vehicle).is_none());
    }
}
