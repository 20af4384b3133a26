use eframe::egui::Ui;

use crate::controller::SpectraController;
use crate::data::form::FieldValue;

#[derive(Debug, Clone, Copy)]
pub struct PanelState {
    pub title: &'static str,
    pub icon: &'static str,
    pub visible: bool,
}

impl PanelState {
    pub fn new(title: &'static str, icon: &'static str) -> Self {
        Self {
            title,
            icon,
            visible: true,
        }
    }
}

/// Requests raised by panels while rendering. The app applies them after the
/// frame's UI pass, so panels only ever read the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Upload { append: bool },
    ClearAll,
    Process,
    /// Pointer moved onto a dataset row, or off all of them.
    HoverDataset(Option<usize>),
    Analyze(usize),
    SetField { id: String, value: FieldValue },
    RefreshPresets,
    /// `name` is `None` when the name prompt was cancelled.
    SavePreset { slot: u8, name: Option<String> },
    LoadPreset(u8),
    DeletePreset(u8),
    ExportMean,
    ExportProcessed,
    ToggleTheme,
    ConfirmDelete,
    CancelDelete,
}

pub trait Panel {
    fn state(&self) -> &PanelState;
    fn state_mut(&mut self) -> &mut PanelState;

    fn title(&self) -> &'static str {
        self.state().title
    }

    fn title_and_icon(&self) -> String {
        format!("{} {}", self.state().icon, self.state().title)
    }

    /// Whether the panel has anything to show for the current state.
    fn is_available(&self, _ctrl: &SpectraController) -> bool {
        true
    }

    fn render_panel(&mut self, ui: &mut Ui, ctrl: &SpectraController, actions: &mut Vec<UiAction>);
}
