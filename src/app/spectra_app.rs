//! Native application wrapper.
//!
//! [`SpectraApp`] owns the [`SpectraController`], the chart surface and a
//! tokio runtime. Remote calls are spawned on the runtime and report back
//! through an mpsc channel that is drained at the start of every frame, so
//! all state changes happen on the UI thread.

use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;
use egui_phosphor::regular::{MOON, SUN};

use crate::color_scheme::Theme;
use crate::config::SpecPlotConfig;
use crate::controller::{SpectraController, StatusKind};
use crate::data::dataset::Dataset;
use crate::data::export::ExportBlob;
use crate::data::processing::{ProcessResponse, ProcessTicket, UploadFile};
use crate::error::{Result, SpecError};
use crate::panels::{
    render_delete_prompt, DatasetsPanel, Panel, PeaksPanel, PresetsPanel, ProcessingPanel,
    UiAction,
};
use crate::plot::PlotSurface;
use crate::presets::{HttpPresetBackend, PresetClient, PresetCommand, PresetReply};
use crate::remote::RemoteClient;

/// Replies from remote calls, delivered to the UI thread.
#[derive(Debug)]
pub enum BackendMessage {
    Uploaded {
        append: bool,
        result: Result<Vec<Dataset>>,
    },
    Processed {
        ticket: ProcessTicket,
        result: Result<ProcessResponse>,
    },
    Preset(Result<PresetReply>),
    Exported(Result<ExportBlob>),
    Analysis {
        label: String,
        result: Result<String>,
    },
}

struct AnalysisWindow {
    label: String,
    text: String,
}

pub struct SpectraApp {
    ctrl: SpectraController,
    chart: PlotSurface,
    remote: RemoteClient,
    presets: PresetClient,
    runtime: tokio::runtime::Runtime,
    tx: Sender<BackendMessage>,
    rx: Receiver<BackendMessage>,
    side_panels: Vec<Box<dyn Panel>>,
    peaks_panel: PeaksPanel,
    analysis: Option<AnalysisWindow>,
    applied_theme: Option<Theme>,
    presets_requested: bool,
}

impl SpectraApp {
    pub fn new(cfg: &SpecPlotConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let remote = RemoteClient::new(cfg.server_url.clone(), cfg.session_token.clone())?;
        let presets = PresetClient::new(Arc::new(HttpPresetBackend::new(remote.clone())));
        let (tx, rx) = channel();
        log::info!("using processing server at {}", remote.base_url());
        Ok(Self {
            ctrl: SpectraController::new(cfg),
            chart: PlotSurface::new(),
            remote,
            presets,
            runtime,
            tx,
            rx,
            side_panels: vec![
                Box::new(DatasetsPanel::default()),
                Box::new(ProcessingPanel::default()),
                Box::new(PresetsPanel::default()),
            ],
            peaks_panel: PeaksPanel::default(),
            analysis: None,
            applied_theme: None,
            presets_requested: false,
        })
    }

    /// Run `fut` on the runtime and post its message back to the UI thread.
    fn spawn<F>(&self, ctx: &egui::Context, fut: F)
    where
        F: Future<Output = BackendMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let msg = fut.await;
            if tx.send(msg).is_err() {
                log::debug!("backend reply dropped: app is shutting down");
            }
            ctx.request_repaint();
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remote call starters
    // ─────────────────────────────────────────────────────────────────────────

    fn start_upload(&mut self, ctx: &egui::Context, append: bool) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Spectra", &["txt", "csv", "dat", "spc"])
            .pick_files()
        else {
            return;
        };
        let files = match read_upload_files(&paths) {
            Ok(files) => files,
            Err(e) => {
                self.ctrl.report_error(&e);
                return;
            }
        };
        self.ctrl
            .set_status(StatusKind::Info, format!("Uploading {} files...", files.len()));
        let remote = self.remote.clone();
        self.spawn(ctx, async move {
            BackendMessage::Uploaded {
                append,
                result: remote.upload(files).await,
            }
        });
    }

    fn start_process(&mut self, ctx: &egui::Context) {
        let (ticket, request) = match self.ctrl.begin_process() {
            Ok(r) => r,
            Err(e) => {
                self.ctrl.report_error(&e);
                return;
            }
        };
        self.ctrl.set_status(StatusKind::Info, "Processing...");
        let remote = self.remote.clone();
        self.spawn(ctx, async move {
            BackendMessage::Processed {
                ticket,
                result: remote.process(&request).await,
            }
        });
    }

    fn start_preset(&mut self, ctx: &egui::Context, command: Option<PresetCommand>) {
        let Some(command) = command else {
            return;
        };
        let client = self.presets.clone();
        self.spawn(ctx, async move { BackendMessage::Preset(client.execute(command).await) });
    }

    fn start_export_mean(&mut self, ctx: &egui::Context) {
        let request = match self.ctrl.mean_export_request() {
            Ok(r) => r,
            Err(e) => return self.ctrl.report_error(&e),
        };
        let remote = self.remote.clone();
        self.spawn(ctx, async move {
            BackendMessage::Exported(remote.export_mean(&request).await)
        });
    }

    fn start_export_processed(&mut self, ctx: &egui::Context) {
        let request = match self.ctrl.processed_export_request() {
            Ok(r) => r,
            Err(e) => return self.ctrl.report_error(&e),
        };
        let remote = self.remote.clone();
        self.spawn(ctx, async move {
            BackendMessage::Exported(remote.export_processed(&request).await)
        });
    }

    fn start_analysis(&mut self, ctx: &egui::Context, index: usize) {
        let (dataset, metadata) = match self.ctrl.analysis_input(index) {
            Ok(r) => r,
            Err(e) => return self.ctrl.report_error(&e),
        };
        self.ctrl
            .set_status(StatusKind::Info, format!("Analyzing {}...", dataset.label));
        let remote = self.remote.clone();
        self.spawn(ctx, async move {
            let result = remote.analyze(&dataset, &metadata).await;
            BackendMessage::Analysis {
                label: dataset.label,
                result,
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Per-frame passes
    // ─────────────────────────────────────────────────────────────────────────

    fn drain_backend(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                BackendMessage::Uploaded { append, result } => {
                    if let Err(e) = result
                        .and_then(|datasets| self.ctrl.adopt_upload(datasets, append, &mut self.chart))
                    {
                        self.ctrl.report_error(&e);
                    }
                }
                BackendMessage::Processed { ticket, result } => {
                    if let Err(e) = self.ctrl.complete_process(ticket, result, &mut self.chart) {
                        self.ctrl.report_error(&e);
                    }
                }
                BackendMessage::Preset(result) => {
                    if self.ctrl.apply_preset_reply(result, &mut self.chart) {
                        self.start_process(ctx);
                    }
                }
                BackendMessage::Exported(result) => match result {
                    Ok(blob) => self.save_blob(&blob),
                    Err(e) => self.ctrl.report_error(&e),
                },
                BackendMessage::Analysis { label, result } => match result {
                    Ok(text) => {
                        self.ctrl.set_status(StatusKind::Success, "Analysis ready");
                        self.analysis = Some(AnalysisWindow { label, text });
                    }
                    Err(e) => self.ctrl.report_error(&e),
                },
            }
        }
    }

    fn save_blob(&mut self, blob: &ExportBlob) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&blob.file_name)
            .save_file()
        else {
            return;
        };
        match blob.save(&path) {
            Ok(()) => {
                log::info!("export written to {path:?}");
                self.ctrl
                    .set_status(StatusKind::Success, format!("Saved {}", path.display()));
            }
            Err(e) => self.ctrl.report_error(&SpecError::Io(e)),
        }
    }

    fn apply_actions(&mut self, ctx: &egui::Context, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::Upload { append } => self.start_upload(ctx, append),
                UiAction::ClearAll => self.ctrl.clear(&mut self.chart),
                UiAction::Process => self.start_process(ctx),
                UiAction::HoverDataset(d) => self.ctrl.hover_dataset(d, &mut self.chart),
                UiAction::Analyze(i) => self.start_analysis(ctx, i),
                UiAction::SetField { id, value } => {
                    if let Err(e) = self.ctrl.set_field(&id, value, &mut self.chart) {
                        self.ctrl.report_error(&e);
                    }
                }
                UiAction::RefreshPresets => {
                    let cmd = self.ctrl.presets().request_list();
                    self.start_preset(ctx, cmd);
                }
                UiAction::SavePreset { slot, name } => {
                    let payload = self.ctrl.form().to_payload();
                    let cmd = self
                        .ctrl
                        .presets_mut()
                        .request_save(slot, name.as_deref(), payload);
                    self.start_preset(ctx, cmd);
                }
                UiAction::LoadPreset(slot) => {
                    let cmd = self.ctrl.presets_mut().request_load(slot);
                    self.start_preset(ctx, cmd);
                }
                UiAction::DeletePreset(slot) => {
                    let cmd = self.ctrl.presets_mut().request_delete(slot);
                    self.start_preset(ctx, cmd);
                }
                UiAction::ExportMean => self.start_export_mean(ctx),
                UiAction::ExportProcessed => self.start_export_processed(ctx),
                UiAction::ToggleTheme => self.ctrl.toggle_theme(&mut self.chart),
                UiAction::ConfirmDelete => {
                    if let Err(e) = self.ctrl.confirm_delete(&mut self.chart) {
                        self.ctrl.report_error(&e);
                    }
                }
                UiAction::CancelDelete => self.ctrl.cancel_delete(),
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("specplot_top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("SpecPlot");
                ui.separator();
                for p in self.side_panels.iter_mut() {
                    let label = p.title_and_icon();
                    ui.toggle_value(&mut p.state_mut().visible, label);
                }
                ui.separator();
                let theme = self.ctrl.theme();
                let icon = if theme.is_dark() { SUN } else { MOON };
                if ui
                    .button(icon)
                    .on_hover_text(format!("Switch to {} theme", theme.toggled().label()))
                    .clicked()
                {
                    actions.push(UiAction::ToggleTheme);
                }
            });
        });
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("specplot_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = self.ctrl.status() {
                    let color = match status.kind {
                        StatusKind::Info => ui.visuals().text_color(),
                        StatusKind::Success => egui::Color32::from_rgb(60, 160, 60),
                        StatusKind::Error => ui.visuals().error_fg_color,
                    };
                    ui.colored_label(color, &status.text);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("{} spectra", self.ctrl.store().len()));
                });
            });
        });
    }

    fn render_analysis(&mut self, ctx: &egui::Context) {
        let Some(window) = &self.analysis else {
            return;
        };
        let mut open = true;
        egui::Window::new(format!("Analysis: {}", window.label))
            .open(&mut open)
            .default_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.label(&window.text);
                });
            });
        if !open {
            self.analysis = None;
        }
    }
}

impl eframe::App for SpectraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let theme = self.ctrl.theme();
        if self.applied_theme != Some(theme) {
            theme.apply(ctx);
            self.applied_theme = Some(theme);
        }
        if !self.presets_requested {
            self.presets_requested = true;
            let cmd = self.ctrl.presets().request_list();
            self.start_preset(ctx, cmd);
        }

        self.drain_backend(ctx);

        let now = Instant::now();
        self.ctrl.tick(now);
        if let Some(deadline) = self.ctrl.interaction().pending_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        let mut actions = Vec::new();
        self.render_top_bar(ctx, &mut actions);
        self.render_status_bar(ctx);

        let Self {
            ctrl,
            side_panels,
            peaks_panel,
            chart,
            ..
        } = self;
        egui::SidePanel::left("specplot_controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for p in side_panels.iter_mut() {
                        if !p.state().visible || !p.is_available(ctrl) {
                            continue;
                        }
                        egui::CollapsingHeader::new(p.title_and_icon())
                            .default_open(true)
                            .show(ui, |ui| p.render_panel(ui, ctrl, &mut actions));
                    }
                });
            });

        if peaks_panel.is_available(ctrl) {
            egui::TopBottomPanel::bottom("specplot_peaks")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    ui.strong(peaks_panel.title_and_icon());
                    peaks_panel.render_panel(ui, ctrl, &mut actions);
                });
        }

        let mut click = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            click = chart.show(ui);
        });
        if let Some(click) = click {
            ctrl.click_trace(&click.target, click.anchor, Instant::now(), chart);
        }

        render_delete_prompt(ctx, ctrl, &mut actions);
        self.render_analysis(ctx);
        self.apply_actions(ctx, actions);
    }
}

fn read_upload_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(UploadFile { name, bytes })
        })
        .collect()
}
