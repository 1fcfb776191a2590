//! Keyboard shortcuts for checkpoint stepping
//!
//! - Space toggles playback
//! - Left/Right step backward/forward, repeating while held
//! - Home/End jump to the first/last checkpoint
//!
//! Every shortcut goes through [`ChangeStepRequest`], same as the slider.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::lib::selection::{ChangeStepRequest, PlaybackState, SelectionController};

/// Hold-to-repeat timing for the arrow keys
#[derive(Resource, Debug, Clone)]
pub struct KeyHoldTimer {
    /// Time since the arrow key was first pressed
    hold_time: f32,
    /// Hold time at the last repeat
    last_repeat: f32,
    /// Initial delay before repeat starts
    pub initial_delay: f32,
    /// Repeat interval
    pub repeat_interval: f32,
}

impl Default for KeyHoldTimer {
    fn default() -> Self {
        Self {
            hold_time: 0.0,
            last_repeat: 0.0,
            initial_delay: 0.4,
            repeat_interval: 0.08,
        }
    }
}

impl KeyHoldTimer {
    pub fn press(&mut self) {
        self.hold_time = 0.0;
        self.last_repeat = 0.0;
    }

    /// Accumulate hold time; true when the held key should repeat this frame
    pub fn hold(&mut self, delta: f32) -> bool {
        self.hold_time += delta;
        if self.hold_time < self.initial_delay {
            return false;
        }
        if self.hold_time - self.last_repeat >= self.repeat_interval {
            self.last_repeat = self.hold_time;
            true
        } else {
            false
        }
    }
}

/// Direction of a manual step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Backward,
    Forward,
}

/// Neighbouring step in `[1, max]`, or `None` at either end
pub fn neighbour_step(current: usize, max: usize, direction: StepDirection) -> Option<usize> {
    match direction {
        StepDirection::Forward if current < max => Some(current + 1),
        StepDirection::Backward if current > 1 => Some(current - 1),
        _ => None,
    }
}

/// System that turns key presses into playback toggles and step requests
pub fn handle_step_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut contexts: EguiContexts,
    controller: Res<SelectionController>,
    mut playback: ResMut<PlaybackState>,
    mut key_timer: ResMut<KeyHoldTimer>,
    mut requests: MessageWriter<ChangeStepRequest>,
) {
    // Leave keys to egui while a widget has focus
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_keyboard_input() {
            return;
        }
    }

    let Some(current) = controller.step() else {
        return;
    };
    let max = controller.step_count();

    if keyboard.just_pressed(KeyCode::Space) {
        playback.toggle();
        info!(
            "Playback {}",
            if playback.is_playing { "started" } else { "paused" }
        );
    }

    if keyboard.just_pressed(KeyCode::Home) {
        playback.stop();
        requests.write(ChangeStepRequest(1));
        return;
    }
    if keyboard.just_pressed(KeyCode::End) {
        playback.stop();
        requests.write(ChangeStepRequest(max));
        return;
    }

    let direction = if keyboard.pressed(KeyCode::ArrowRight) {
        StepDirection::Forward
    } else if keyboard.pressed(KeyCode::ArrowLeft) {
        StepDirection::Backward
    } else {
        return;
    };

    // Manual stepping stops playback
    playback.stop();

    let step_now = if keyboard.just_pressed(KeyCode::ArrowRight)
        || keyboard.just_pressed(KeyCode::ArrowLeft)
    {
        key_timer.press();
        true
    } else {
        key_timer.hold(time.delta_secs())
    };

    if step_now {
        if let Some(next) = neighbour_step(current, max, direction) {
            requests.write(ChangeStepRequest(next));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbour_step_stops_at_ends() {
        assert_eq!(neighbour_step(1, 25, StepDirection::Forward), Some(2));
        assert_eq!(neighbour_step(25, 25, StepDirection::Forward), None);
        assert_eq!(neighbour_step(2, 25, StepDirection::Backward), Some(1));
        assert_eq!(neighbour_step(1, 25, StepDirection::Backward), None);
    }

    #[test]
    fn test_hold_waits_for_initial_delay_then_repeats() {
        let mut timer = KeyHoldTimer {
            initial_delay: 0.5,
            repeat_interval: 0.25,
            ..Default::default()
        };
        timer.press();

        assert!(!timer.hold(0.25));
        assert!(timer.hold(0.5));
        assert!(!timer.hold(0.125));
        assert!(timer.hold(0.125));
    }

    #[test]
    fn test_press_restarts_the_delay() {
        let mut timer = KeyHoldTimer::default();
        timer.press();
        assert!(timer.hold(1.0));
        timer.press();
        assert!(!timer.hold(0.1));
    }
}
