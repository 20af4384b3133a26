pub mod datasets_ui;
pub mod delete_ui;
pub mod panel_trait;
pub mod peaks_ui;
pub mod presets_ui;
pub mod processing_ui;

pub use datasets_ui::DatasetsPanel;
pub use delete_ui::render_delete_prompt;
pub use panel_trait::{Panel, PanelState, UiAction};
pub use peaks_ui::PeaksPanel;
pub use presets_ui::PresetsPanel;
pub use processing_ui::ProcessingPanel;
