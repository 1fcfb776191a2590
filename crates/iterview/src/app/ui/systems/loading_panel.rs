//! Loading progress shown until every mesh is in the scene

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::lib::model_assets::{ModelLoadTracker, ViewerState};

pub fn loading_panel_system(
    mut contexts: EguiContexts,
    state: Res<State<ViewerState>>,
    tracker: Option<Res<ModelLoadTracker>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Loading models")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let Some(tracker) = tracker else {
                ui.label("Preparing...");
                return;
            };

            ui.add(
                egui::ProgressBar::new(tracker.progress())
                    .desired_width(320.0)
                    .show_percentage(),
            );
            ui.label(format!("{} / {} meshes", tracker.loaded(), tracker.total()));

            if *state.get() == ViewerState::Failed {
                ui.separator();
                ui.colored_label(egui::Color32::LIGHT_RED, "Loading failed:");
                for failure in tracker.failures() {
                    ui.label(failure.to_string());
                }
            }
        });

    Ok(())
}
