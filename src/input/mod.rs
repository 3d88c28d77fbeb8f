// Input module - pointer gestures, part picking and keyboard commands
use bevy::prelude::*;

pub mod commands;
pub mod gesture;
pub mod picking;

use crate::config::HoldToPlaceConfig;
use crate::types::PlacementConfirmed;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoldToPlaceConfig>()
            .add_event::<PlacementConfirmed>()
            .add_systems(Startup, gesture::setup_hold_to_place)
            .add_systems(Update, (
                gesture::hold_to_place_system,
                picking::pick_part_system,
                commands::keyboard_commands_system,
            ));
    }
}
