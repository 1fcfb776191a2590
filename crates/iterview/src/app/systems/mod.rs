//! Viewer systems outside the selection core: scene setup, the orbiting
//! camera and keyboard shortcuts.

pub mod camera;
pub mod input;
pub mod scene;

use bevy::prelude::*;

use crate::lib::model_assets::ViewerState;
use crate::lib::selection::SelectionSet;

pub use camera::OrbitCamera;
pub use input::KeyHoldTimer;
pub use scene::OrbitConfig;

/// Plugin for the scene, camera and keyboard input
pub struct ViewerSystemsPlugin;

impl Plugin for ViewerSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitConfig>()
            .init_resource::<KeyHoldTimer>()
            .add_systems(Startup, scene::setup_scene)
            .add_systems(Update, camera::orbit_camera)
            .add_systems(
                Update,
                input::handle_step_keys
                    .in_set(SelectionSet::Input)
                    .run_if(in_state(ViewerState::Ready)),
            );
    }
}
