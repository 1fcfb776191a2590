//! Automatic advancement through checkpoint steps

use bevy::prelude::*;

use super::{ChangeStepRequest, SelectionController, SelectionSet};
use crate::lib::model_assets::ViewerState;

/// Plugin for checkpoint playback
pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaybackState>().add_systems(
            Update,
            advance_playback
                .in_set(SelectionSet::Input)
                .run_if(in_state(ViewerState::Ready)),
        );
    }
}

/// Playback state and timing
#[derive(Resource, Debug, Clone)]
pub struct PlaybackState {
    /// Whether playback is active
    pub is_playing: bool,
    /// Seconds each checkpoint stays on screen
    pub interval: f32,
    /// Whether to wrap from the last step back to step 1
    pub loop_enabled: bool,
    /// Time accumulated since the last advance
    elapsed: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            interval: 0.5,
            loop_enabled: true,
            elapsed: 0.0,
        }
    }
}

impl PlaybackState {
    pub fn new(interval: f32, loop_enabled: bool) -> Self {
        Self {
            interval: interval.max(0.01),
            loop_enabled,
            ..Default::default()
        }
    }

    pub fn toggle(&mut self) {
        self.is_playing = !self.is_playing;
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.elapsed = 0.0;
    }

    /// Accumulate `delta` seconds and return the step to show next, if the
    /// interval elapsed. Reaching the end either wraps to step 1 or stops.
    pub fn tick(&mut self, delta: f32, current: usize, max: usize) -> Option<usize> {
        if !self.is_playing || max == 0 {
            return None;
        }

        self.elapsed += delta;
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed -= self.interval;

        if current < max {
            Some(current + 1)
        } else if self.loop_enabled {
            Some(1)
        } else {
            self.stop();
            None
        }
    }
}

/// System that requests the next step when the playback interval elapses
fn advance_playback(
    time: Res<Time>,
    mut playback: ResMut<PlaybackState>,
    controller: Res<SelectionController>,
    mut requests: MessageWriter<ChangeStepRequest>,
) {
    let Some(current) = controller.step() else {
        return;
    };

    if let Some(next) = playback.tick(time.delta_secs(), current, controller.step_count()) {
        requests.write(ChangeStepRequest(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_playback_never_advances() {
        let mut playback = PlaybackState::default();
        assert_eq!(playback.tick(10.0, 1, 25), None);
    }

    #[test]
    fn test_advances_once_per_interval() {
        let mut playback = PlaybackState::new(0.5, true);
        playback.toggle();

        assert_eq!(playback.tick(0.3, 1, 25), None);
        assert_eq!(playback.tick(0.3, 1, 25), Some(2));
        // Remainder carries over
        assert_eq!(playback.tick(0.45, 2, 25), Some(3));
    }

    #[test]
    fn test_end_of_sequence_wraps_or_stops() {
        let mut looping = PlaybackState::new(0.1, true);
        looping.toggle();
        assert_eq!(looping.tick(0.1, 3, 3), Some(1));

        let mut once = PlaybackState::new(0.1, false);
        once.toggle();
        assert_eq!(once.tick(0.1, 3, 3), None);
        assert!(!once.is_playing);
    }
}
