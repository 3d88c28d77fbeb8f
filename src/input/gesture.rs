// Hold-to-place gesture - debounces a still single-finger press into one placement event
use bevy::prelude::*;
use bevy::input::touch::Touch;
use bevy::window::PrimaryWindow;

use crate::config::{ConfigError, HoldToPlaceConfig};
use crate::types::PlacementConfirmed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Began,
    Held,
    Ended,
}

/// One frame of raw pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub touch_count: usize,
    pub phase: PointerPhase,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HoldState {
    #[default]
    Idle,
    Tracking { start: Vec2, started_at: f32 },
}

#[derive(Resource, Debug, Clone)]
pub struct HoldToPlace {
    config: HoldToPlaceConfig,
    state: HoldState,
}

impl HoldToPlace {
    pub fn new(config: HoldToPlaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: HoldState::Idle,
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Feed one frame of input. Returns the screen position once per qualifying hold.
    pub fn update(&mut self, sample: Option<PointerSample>, now: f32) -> Option<Vec2> {
        // No touch, or a multi-finger gesture, cancels the hold
        let Some(sample) = sample.filter(|s| s.touch_count == 1) else {
            self.state = HoldState::Idle;
            return None;
        };

        match (sample.phase, self.state) {
            (PointerPhase::Began, _) => {
                self.state = HoldState::Tracking {
                    start: sample.position,
                    started_at: now,
                };
                None
            }
            (PointerPhase::Held, HoldState::Tracking { start, started_at }) => {
                if sample.position.distance(start) > self.config.max_move_distance {
                    debug!("Hold cancelled: moved {:.1}px", sample.position.distance(start));
                    self.state = HoldState::Idle;
                    None
                } else if now - started_at >= self.config.hold_threshold {
                    self.state = HoldState::Idle;
                    Some(sample.position)
                } else {
                    None
                }
            }
            (PointerPhase::Held, HoldState::Idle) => None,
            (PointerPhase::Ended, _) => {
                self.state = HoldState::Idle;
                None
            }
        }
    }
}

/// Map touches (or the left mouse button when no finger is down) to a pointer sample
fn sample_pointer(
    touches: &Touches,
    mouse_button: &ButtonInput<MouseButton>,
    cursor: Option<Vec2>,
) -> Option<PointerSample> {
    let active: Vec<&Touch> = touches.iter().collect();
    if let Some(first) = active.first() {
        let phase = if touches.just_pressed(first.id()) {
            PointerPhase::Began
        } else {
            PointerPhase::Held
        };
        return Some(PointerSample {
            touch_count: active.len(),
            phase,
            position: first.position(),
        });
    }
    if let Some(released) = touches.iter_just_released().next() {
        return Some(PointerSample {
            touch_count: 1,
            phase: PointerPhase::Ended,
            position: released.position(),
        });
    }

    let position = cursor?;
    let phase = if mouse_button.just_pressed(MouseButton::Left) {
        PointerPhase::Began
    } else if mouse_button.pressed(MouseButton::Left) {
        PointerPhase::Held
    } else if mouse_button.just_released(MouseButton::Left) {
        PointerPhase::Ended
    } else {
        return None;
    };
    Some(PointerSample { touch_count: 1, phase, position })
}

/// Startup: install the detector only if its configuration is valid
pub fn setup_hold_to_place(mut commands: Commands, config: Res<HoldToPlaceConfig>) {
    match HoldToPlace::new(*config) {
        Ok(detector) => {
            commands.insert_resource(detector);
        }
        Err(err) => error!("Hold-to-place disabled: {}", err),
    }
}

/// System: run the detector on this frame's pointer input
pub fn hold_to_place_system(
    time: Res<Time>,
    touches: Res<Touches>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    detector: Option<ResMut<HoldToPlace>>,
    mut placements: EventWriter<PlacementConfirmed>,
) {
    let Some(mut detector) = detector else { return };
    let cursor = window_query.single().ok().and_then(|w| w.cursor_position());

    let sample = sample_pointer(&touches, &mouse_button, cursor);
    if let Some(screen_position) = detector.update(sample, time.elapsed_secs()) {
        info!("Hold confirmed at {:?}", screen_position);
        placements.write(PlacementConfirmed { screen_position });
    }
}
