//! Bottom panel with the checkpoint slider and playback toggle

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::lib::selection::{ChangeStepRequest, PlaybackState, SelectionController};

pub fn step_panel_system(
    mut contexts: EguiContexts,
    controller: Res<SelectionController>,
    mut playback: ResMut<PlaybackState>,
    mut requests: MessageWriter<ChangeStepRequest>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let Some(mut step) = controller.step() else {
        return Ok(());
    };
    let control = controller.step_control();

    egui::TopBottomPanel::bottom("step_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                let play_pause_text = if playback.is_playing { "⏸" } else { "▶" };
                if ui
                    .button(play_pause_text)
                    .on_hover_text(if playback.is_playing { "Pause" } else { "Play" })
                    .clicked()
                {
                    playback.toggle();
                }

                ui.separator();

                let label = controller.label().unwrap_or_default();
                ui.add_sized([110.0, 20.0], egui::Label::new(label));

                ui.spacing_mut().slider_width = (ui.available_width() - 20.0).max(50.0);
                let response = ui.add(egui::Slider::new(&mut step, control.range()).show_value(false));

                if response.changed() {
                    playback.stop();
                    requests.write(ChangeStepRequest(step));
                }
            });
            ui.add_space(5.0);
        });

    Ok(())
}
