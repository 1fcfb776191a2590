//! Model dropdown with its "Load" button

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::app::ui::state::UiState;
use crate::lib::catalog::ModelCatalog;
use crate::lib::selection::{SelectionController, SwitchModelRequest};

pub fn model_panel_system(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    catalog: Res<ModelCatalog>,
    controller: Res<SelectionController>,
    mut requests: MessageWriter<SwitchModelRequest>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let mut chosen = ui_state
        .chosen_or(controller.active_model(), &catalog)
        .to_string();

    egui::Window::new("Model")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("model_select")
                    .selected_text(chosen.as_str())
                    .show_ui(ui, |ui| {
                        for name in catalog.names() {
                            ui.selectable_value(&mut chosen, name.clone(), name.as_str());
                        }
                    });

                // Picking in the dropdown alone changes nothing in the scene
                if ui.button("Load").clicked() {
                    requests.write(SwitchModelRequest(chosen.clone()));
                }
            });
        });

    ui_state.chosen_model = Some(chosen);
    Ok(())
}
