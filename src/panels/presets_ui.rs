use chrono::Local;
use eframe::egui;
use egui::{Color32, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FLOPPY_DISK, FOLDER_OPEN, LOCK, TRASH};

use super::panel_trait::{Panel, PanelState, UiAction};
use crate::controller::SpectraController;
use crate::presets::NoticeKind;

/// Five server-side slots holding named copies of the processing form.
pub struct PresetsPanel {
    pub state: PanelState,
    /// Slot being named and the name typed so far.
    prompt: Option<(u8, String)>,
}

impl Default for PresetsPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Presets", "💾"),
            prompt: None,
        }
    }
}

impl Panel for PresetsPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut PanelState {
        &mut self.state
    }

    fn render_panel(&mut self, ui: &mut Ui, ctrl: &SpectraController, actions: &mut Vec<UiAction>) {
        let presets = ctrl.presets();
        if let Some(notice) = presets.notice() {
            let color = match notice.kind {
                NoticeKind::Info => ui.visuals().text_color(),
                NoticeKind::Success => Color32::from_rgb(60, 160, 60),
                NoticeKind::Error => ui.visuals().error_fg_color,
                NoticeKind::Locked => ui.visuals().warn_fg_color,
            };
            let text = if notice.kind == NoticeKind::Locked {
                format!("{LOCK} {}", notice.text)
            } else {
                notice.text.clone()
            };
            ui.colored_label(color, text);
        }
        if presets.is_locked() {
            self.prompt = None;
        }

        ui.add_enabled_ui(presets.controls_enabled(), |ui| {
            if ui.small_button(format!("{ARROWS_CLOCKWISE} Refresh")).clicked() {
                actions.push(UiAction::RefreshPresets);
            }
            egui::Grid::new("preset_slots")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (slot, summary) in presets.slots() {
                        match summary {
                            Some(s) => {
                                let label = ui.label(format!("{slot}. {}", s.name));
                                if let Some(at) = s.updated_at {
                                    label.on_hover_text(format!(
                                        "Saved {}",
                                        at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                                    ));
                                }
                            }
                            None => {
                                ui.weak(format!("{slot}. (empty)"));
                            }
                        }
                        ui.horizontal(|ui| {
                            if ui.small_button(FLOPPY_DISK).on_hover_text("Save").clicked() {
                                let name = summary.map(|s| s.name.clone()).unwrap_or_default();
                                self.prompt = Some((slot, name));
                            }
                            if ui
                                .add_enabled(summary.is_some(), egui::Button::new(FOLDER_OPEN).small())
                                .on_hover_text("Load")
                                .clicked()
                            {
                                actions.push(UiAction::LoadPreset(slot));
                            }
                            if ui.small_button(TRASH).on_hover_text("Delete").clicked() {
                                actions.push(UiAction::DeletePreset(slot));
                            }
                        });
                        ui.end_row();
                    }
                });
        });

        let mut close = false;
        if let Some((slot, name)) = &mut self.prompt {
            ui.separator();
            ui.label(format!("Name for slot {slot}:"));
            if let Some(existing) = presets.slot(*slot) {
                ui.weak(format!("Replaces '{}'", existing.name));
            }
            let edit = ui.text_edit_singleline(name);
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() || submitted {
                    actions.push(UiAction::SavePreset {
                        slot: *slot,
                        name: Some(name.clone()),
                    });
                    close = true;
                }
                if ui.button("Cancel").clicked() {
                    actions.push(UiAction::SavePreset {
                        slot: *slot,
                        name: None,
                    });
                    close = true;
                }
            });
        }
        if close {
            self.prompt = None;
        }
    }
}
