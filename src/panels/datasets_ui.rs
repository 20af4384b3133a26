use eframe::egui;
use egui::Ui;
use egui_phosphor::regular::{BROOM, PLUS, SPARKLE, UPLOAD_SIMPLE};

use super::panel_trait::{Panel, PanelState, UiAction};
use crate::controller::SpectraController;
use crate::data::overlay::spectrum_name;
use crate::data::trace_look::TraceLook;

/// Loaded spectra, one row each. Hovering a row highlights its traces.
pub struct DatasetsPanel {
    pub state: PanelState,
    hovered: Option<usize>,
}

impl Default for DatasetsPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Spectra", "📄"),
            hovered: None,
        }
    }
}

impl Panel for DatasetsPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, ctrl: &SpectraController, actions: &mut Vec<UiAction>) {
        let store = ctrl.store();
        ui.horizontal(|ui| {
            if ui
                .button(format!("{UPLOAD_SIMPLE} Upload"))
                .on_hover_text("Replace the loaded spectra with new files")
                .clicked()
            {
                actions.push(UiAction::Upload { append: false });
            }
            if ui
                .add_enabled(!store.is_empty(), egui::Button::new(format!("{PLUS} Add")))
                .on_hover_text("Append files to the loaded spectra")
                .clicked()
            {
                actions.push(UiAction::Upload { append: true });
            }
            if ui
                .add_enabled(!store.is_empty(), egui::Button::new(format!("{BROOM} Clear")))
                .clicked()
            {
                actions.push(UiAction::ClearAll);
            }
        });
        ui.separator();

        if store.is_empty() {
            ui.label("No spectra loaded.");
            self.set_hovered(None, actions);
            return;
        }

        let mut now_hovered = None;
        for d in store.iter() {
            let name = spectrum_name(d.label, d.index, ctrl.label_max_len());
            let row = ui.horizontal(|ui| {
                ui.colored_label(TraceLook::alloc_color(d.index), "■");
                ui.label(&name)
                    .on_hover_text(format!("{} ({} points)", d.label, d.frequencies.len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button(SPARKLE)
                        .on_hover_text("Ask the server for an analysis of this spectrum")
                        .clicked()
                    {
                        actions.push(UiAction::Analyze(d.index));
                    }
                });
            });
            if ui.rect_contains_pointer(row.response.rect) {
                now_hovered = Some(d.index);
            }
        }
        ui.add_space(4.0);
        ui.weak("Click a spectrum on the chart to remove it.");
        self.set_hovered(now_hovered, actions);
    }
}

impl DatasetsPanel {
    /// Emit a hover action on transitions only.
    fn set_hovered(&mut self, hovered: Option<usize>, actions: &mut Vec<UiAction>) {
        if hovered != self.hovered {
            self.hovered = hovered;
            actions.push(UiAction::HoverDataset(hovered));
        }
    }
}
