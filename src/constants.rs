use bevy::prelude::Color;

// Single-part explode settings
pub const PART_LIFT_DISTANCE: f32 = 0.1;      // Vertical lift applied to the tapped part (meters)
pub const LABEL_HEIGHT: f32 = 0.15;           // Label offset above the part's bounds center
pub const LABEL_FONT_SIZE: f32 = 64.0;         // In label texture pixels
pub const LABEL_TEXT_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const LABEL_PLATE_SIZE: (f32, f32) = (0.24, 0.06);
pub const LABEL_PLATE_COLOR: Color = Color::srgba(0.05, 0.08, 0.12, 0.75);
pub const LABEL_TEXTURE_SIZE: (u32, u32) = (512, 128); // Same aspect as the plate

// Full-assembly explode settings
pub const FULL_EXPLODE_DISTANCE: f32 = 0.5;   // Radial distance each hinge group travels
pub const FULL_EXPLODE_DURATION: f32 = 1.0;   // Seconds for explode/collapse animation

// Ghost appearance
pub const GHOST_COLOR: Color = Color::srgba(0.55, 0.8, 1.0, 0.18);
pub const OUTLINE_COLOR: Color = Color::srgb(0.35, 0.85, 1.0);
pub const OUTLINE_HULL_SCALE: f32 = 1.03;     // Inverted-hull outline overlay scale

/// Direct children of the assembly root with these names are never explodable
pub const NON_EXPLODABLE_GROUPS: &[&str] = &["Other"];

// Hold-to-place gesture
pub const HOLD_THRESHOLD_SECS: f32 = 0.5;     // Seconds a press must be held before placement
pub const HOLD_MAX_MOVE_PX: f32 = 10.0;       // Max finger travel (pixels) tolerated during a hold

// Placement
pub const GROUND_PLANE_Y: f32 = 0.0;

// Orbit camera settings
pub const CAMERA_ZOOM_SPEED: f32 = 0.5;
pub const CAMERA_MIN_DISTANCE: f32 = 1.5;
pub const CAMERA_MAX_DISTANCE: f32 = 20.0;
pub const CAMERA_ROTATION_SPEED: f32 = 0.005;
pub const CAMERA_INITIAL_DISTANCE: f32 = 6.0;
pub const CAMERA_INITIAL_PITCH: f32 = -0.45;
pub const CAMERA_PAN_SPEED: f32 = 2.0;        // Focus point pan speed (meters/second)
