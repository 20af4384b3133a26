use eframe::egui;
use egui_phosphor::regular::TRASH;

use super::panel_trait::UiAction;
use crate::controller::SpectraController;
use crate::data::overlay::spectrum_name;

/// Floating delete confirmation next to the clicked spectrum.
pub fn render_delete_prompt(
    ctx: &egui::Context,
    ctrl: &SpectraController,
    actions: &mut Vec<UiAction>,
) {
    let Some((dataset, anchor)) = ctrl.pending_delete() else {
        return;
    };
    let Some(d) = ctrl.store().get(dataset) else {
        return;
    };
    let name = spectrum_name(d.label, dataset, ctrl.label_max_len());
    egui::Area::new(egui::Id::new("delete_prompt"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(anchor[0] + 8.0, anchor[1] + 8.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(format!("Remove {name}?"));
                ui.horizontal(|ui| {
                    if ui.button(format!("{TRASH} Delete")).clicked() {
                        actions.push(UiAction::ConfirmDelete);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::CancelDelete);
                    }
                });
            });
        });
}
