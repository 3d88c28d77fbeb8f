use bevy::prelude::*;

mod config;
mod constants;
mod explode;
mod input;
mod math_utils;
mod movement;
mod placement;
mod procedural_meshes;
mod setup;
mod types;
mod ui;

use explode::ExplodePlugin;
use input::InputPlugin;
use placement::PlacementPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "X-Ray Explode Viewer".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((InputPlugin, PlacementPlugin, ExplodePlugin))
        .add_systems(Startup, setup::setup_scene)
        .add_systems(Update, (
            movement::orbit_camera_movement,
            ui::update_hud,
        ))
        .run();
}
