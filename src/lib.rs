//! SpecPlot crate root: re-exports and module wiring.
//!
//! SpecPlot loads labeled spectra from a processing server, overlays them on
//! one chart, and keeps that chart in sync with the loaded datasets, the
//! latest processing result and the user's pointer.
//!
//! - `data`: dataset store, processing types, overlay composer, form state
//! - `chart`: the chart adapter contract; `plot` implements it with egui_plot
//! - `interaction`: hover highlight and click-to-delete state machine
//! - `presets`: server-side configuration slots
//! - `remote`: HTTP client for the processing server
//! - `controller`: owns all of the above and sequences every user action
//! - `app`: eframe window wiring

pub mod app;
pub mod chart;
pub mod color_scheme;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod interaction;
pub mod panels;
pub mod plot;
pub mod presets;
pub mod remote;

// Public re-exports for a compact external API
pub use app::{run_specplot, SpectraApp};
pub use chart::{ChartAdapter, ChartLayout, StyleDelta};
pub use color_scheme::Theme;
pub use config::SpecPlotConfig;
pub use controller::{SpectraController, StatusKind, StatusMessage};
pub use data::dataset::{Dataset, DatasetStore};
pub use data::overlay::{compose_overlay, DisplayOptions, OverlayTrace, TraceRole};
pub use data::processing::{ProcessingResult, RequestSequencer};
pub use error::{Result, SpecError};
pub use interaction::{ClickTarget, HighlightState, InteractionController};
pub use presets::{PresetBackend, PresetClient, PresetPanelState};
pub use remote::RemoteClient;
