// Keyboard commands - mode gate and full-explode toggle
use bevy::prelude::*;

use crate::types::{ExplodeMode, SetExplodeMode, ToggleFullExplode};

/// System: E flips explode mode, F toggles the full-assembly explode
pub fn keyboard_commands_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mode: Res<ExplodeMode>,
    mut mode_events: EventWriter<SetExplodeMode>,
    mut toggle_events: EventWriter<ToggleFullExplode>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyE) {
        mode_events.write(SetExplodeMode(!mode.active));
    }
    if keyboard_input.just_pressed(KeyCode::KeyF) {
        toggle_events.write(ToggleFullExplode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn world_with_keys(pressed: &[KeyCode], active: bool) -> World {
        let mut world = World::new();
        let mut keys = ButtonInput::<KeyCode>::default();
        for key in pressed {
            keys.press(*key);
        }
        world.insert_resource(keys);
        world.insert_resource(ExplodeMode { active });
        world.init_resource::<Events<SetExplodeMode>>();
        world.init_resource::<Events<ToggleFullExplode>>();
        world
    }

    #[test]
    fn e_requests_the_opposite_mode() {
        let mut world = world_with_keys(&[KeyCode::KeyE], true);
        world.run_system_once(keyboard_commands_system).unwrap();

        let events = world.resource::<Events<SetExplodeMode>>();
        let sent: Vec<bool> = events.iter_current_update_events().map(|e| e.0).collect();
        assert_eq!(sent, vec![false]);
        assert!(world.resource::<Events<ToggleFullExplode>>().is_empty());
    }

    #[test]
    fn f_requests_full_toggle() {
        let mut world = world_with_keys(&[KeyCode::KeyF], false);
        world.run_system_once(keyboard_commands_system).unwrap();

        assert_eq!(world.resource::<Events<ToggleFullExplode>>().len(), 1);
        assert!(world.resource::<Events<SetExplodeMode>>().is_empty());
    }
}
