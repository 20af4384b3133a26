use eframe::egui;
use egui::Ui;

use super::panel_trait::{Panel, PanelState, UiAction};
use crate::controller::SpectraController;

/// Table of detected peaks, shown when "Show peak table" is ticked.
pub struct PeaksPanel {
    pub state: PanelState,
}

impl Default for PeaksPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Peaks", "📍"),
        }
    }
}

impl Panel for PeaksPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn is_available(&self, ctrl: &SpectraController) -> bool {
        ctrl.form().checked("show_peak_table")
    }

    fn render_panel(&mut self, ui: &mut Ui, ctrl: &SpectraController, _actions: &mut Vec<UiAction>) {
        let rows = ctrl.peak_rows();
        if rows.is_empty() {
            ui.label("No peaks detected. Enable \"Find peaks\" and process.");
            return;
        }
        egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
            egui::Grid::new("peak_table")
                .num_columns(4)
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("File");
                    ui.strong("#");
                    ui.strong("Frequency");
                    ui.strong("Amplitude");
                    ui.end_row();
                    for row in &rows {
                        ui.label(&row.file);
                        ui.label(row.number.to_string());
                        ui.label(format!("{:.2}", row.frequency));
                        ui.label(format!("{:.4}", row.amplitude));
                        ui.end_row();
                    }
                });
        });
    }
}
