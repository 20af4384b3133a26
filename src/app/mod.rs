//! Native window for SpecPlot.
//!
//! | Sub-module        | Responsibility |
//! | ----------------- | -------------- |
//! | [`spectra_app`]   | [`SpectraApp`] (eframe) wrapper, remote call plumbing, per-frame passes |
//! | [`run`]           | Top-level [`run_specplot()`] entry point |

mod run;
mod spectra_app;

pub use run::run_specplot;
pub use spectra_app::{BackendMessage, SpectraApp};
