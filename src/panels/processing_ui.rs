use eframe::egui;
use egui::Ui;
use egui_phosphor::regular::{DOWNLOAD_SIMPLE, PLAY};

use super::panel_trait::{Panel, PanelState, UiAction};
use crate::controller::SpectraController;
use crate::data::form::{FieldKind, FieldValue};

/// Processing options and the process/export buttons.
pub struct ProcessingPanel {
    pub state: PanelState,
}

impl Default for ProcessingPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Processing", "⚙"),
        }
    }
}

impl Panel for ProcessingPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, ctrl: &SpectraController, actions: &mut Vec<UiAction>) {
        let form = ctrl.form();
        for field in form.fields() {
            let enabled = form.is_enabled(field.id);
            ui.horizontal(|ui| {
                if field.enabled_by.is_some() {
                    ui.add_space(18.0);
                }
                match field.kind {
                    FieldKind::Checkbox => {
                        let mut v = field.value.as_bool().unwrap_or(false);
                        if ui.checkbox(&mut v, field.label).changed() {
                            actions.push(UiAction::SetField {
                                id: field.id.to_string(),
                                value: FieldValue::Bool(v),
                            });
                        }
                    }
                    FieldKind::Number => {
                        ui.add_enabled(enabled, egui::Label::new(field.label));
                        let mut text = field.value.to_text();
                        let mut edit = egui::TextEdit::singleline(&mut text).desired_width(80.0);
                        if let Some(d) = field.default {
                            edit = edit.hint_text(d);
                        }
                        if ui.add_enabled(enabled, edit).changed() {
                            actions.push(UiAction::SetField {
                                id: field.id.to_string(),
                                value: FieldValue::Text(text),
                            });
                        }
                    }
                }
            });
        }

        ui.separator();
        ui.horizontal(|ui| {
            let can_process = !ctrl.store().is_empty() && !ctrl.is_processing();
            if ui
                .add_enabled(can_process, egui::Button::new(format!("{PLAY} Process")))
                .clicked()
            {
                actions.push(UiAction::Process);
            }
            if ctrl.is_processing() {
                ui.spinner();
            }
        });

        let result = ctrl.result();
        ui.horizontal(|ui| {
            let has_mean = result.is_some_and(|r| r.mean.is_some());
            if ui
                .add_enabled(has_mean, egui::Button::new(format!("{DOWNLOAD_SIMPLE} Mean spectrum")))
                .on_disabled_hover_text("Process with mean ± σ first")
                .clicked()
            {
                actions.push(UiAction::ExportMean);
            }
            if ui
                .add_enabled(result.is_some(), egui::Button::new(format!("{DOWNLOAD_SIMPLE} Processed data")))
                .on_disabled_hover_text("Process the spectra first")
                .clicked()
            {
                actions.push(UiAction::ExportProcessed);
            }
        });
    }
}
