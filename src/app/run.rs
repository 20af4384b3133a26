//! Top-level entry point for running SpecPlot as a native window.

use eframe::egui;

use crate::config::SpecPlotConfig;

use super::spectra_app::SpectraApp;

/// Launch SpecPlot in a native window.
///
/// Opens the window described by `cfg`, installs the Phosphor icon font and
/// enters the eframe event loop. The call blocks until the window is closed.
pub fn run_specplot(mut cfg: SpecPlotConfig) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let mut opts = cfg.native_options.take().unwrap_or_default();

    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts
            .viewport
            .clone()
            .with_inner_size(egui::vec2(1400.0, 900.0));
    }

    eframe::run_native(
        &title,
        opts,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            let app = SpectraApp::new(&cfg)?;
            Ok(Box::new(app))
        }),
    )
}
