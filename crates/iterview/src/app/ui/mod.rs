//! User interface module for Iterview
//!
//! All widgets are drawn with bevy_egui. They only ever read selection state
//! and send selection requests; visibility is left to the controller.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod state;
pub mod systems;

pub use state::UiState;

/// Main UI plugin that sets up all UI functionality
pub struct IterviewUiPlugin;

impl Plugin for IterviewUiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }

        app.init_resource::<UiState>()
            .add_plugins(systems::UiSystemsPlugin);
    }
}
