//! UI systems and their registration

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::lib::model_assets::ViewerState;

mod loading_panel;
mod model_panel;
mod step_panel;

pub use loading_panel::loading_panel_system;
pub use model_panel::model_panel_system;
pub use step_panel::step_panel_system;

/// Plugin that registers all UI systems
pub struct UiSystemsPlugin;

impl Plugin for UiSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            EguiPrimaryContextPass,
            loading_panel_system.run_if(not(in_state(ViewerState::Ready))),
        )
        .add_systems(
            EguiPrimaryContextPass,
            (model_panel_system, step_panel_system).run_if(in_state(ViewerState::Ready)),
        );
    }
}
