use bevy::prelude::*;

/// Mode gate: when active, part clicks explode parts; otherwise they go to the hinge animator
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplodeMode {
    pub active: bool,
}

/// Marker for the root of a placed vehicle (the entity carrying the world pose)
#[derive(Component)]
pub struct PlacedVehicle;

#[derive(Component)]
pub struct OrbitCamera {
    pub focus_point: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

/// Marker for the mode/phase status line
#[derive(Component)]
pub struct HudText;

// ============================================================================
// EVENTS
// ============================================================================

/// External command that flips the mode gate
#[derive(Event, Debug, Clone, Copy)]
pub struct SetExplodeMode(pub bool);

/// External zero-argument trigger for the full-assembly explode toggle
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ToggleFullExplode;

/// A node was picked this tick. The node may be any descendant of an explodable part
#[derive(Event, Debug, Clone, Copy)]
pub struct PartSelected {
    pub node: Entity,
}

/// Sent instead of an explode when the mode gate is off; consumed by the hinge animator
#[derive(Event, Debug, Clone)]
pub struct HingeToggleRequested {
    pub assembly: Entity,
    pub part: Entity,
    pub name: String,
}

/// Debounced press-and-hold at a screen position
#[derive(Event, Debug, Clone, Copy)]
pub struct PlacementConfirmed {
    pub screen_position: Vec2,
}

/// A world pose for the vehicle resolved from a confirmed placement
#[derive(Event, Debug, Clone, Copy)]
pub struct AssemblyPlaced {
    pub pose: Transform,
}
