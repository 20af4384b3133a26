//! The spectra controller: sole owner of the application state.
//!
//! Every user action goes through here and follows the same path:
//! store mutation or remote reply → overlay rebuild → chart render →
//! interaction reset. The controller never talks to the network itself; the
//! app runs the remote calls and feeds their results back in.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::chart::{ChartAdapter, ChartLayout};
use crate::color_scheme::Theme;
use crate::config::SpecPlotConfig;
use crate::data::dataset::{Dataset, DatasetStore};
use crate::data::export::{MeanExportRequest, ProcessedExportRequest};
use crate::data::form::{FieldValue, FormState};
use crate::data::overlay::{compose_overlay, OverlayTrace};
use crate::data::peaks::{peak_rows, PeakRow};
use crate::data::processing::{
    ProcessRequest, ProcessResponse, ProcessTicket, ProcessingResult, RequestSequencer,
};
use crate::error::{Result, SpecError};
use crate::interaction::{ClickTarget, HighlightState, InteractionController};
use crate::presets::{PresetPanelState, PresetReply};

/// Form fields that only change how the current result is displayed.
const DISPLAY_FIELDS: [&str; 3] = ["show_only_mean_std", "calculate_mean_std", "calculate_boxplot"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug)]
pub struct SpectraController {
    store: DatasetStore,
    result: Option<ProcessingResult>,
    traces: Vec<OverlayTrace>,
    form: FormState,
    interaction: InteractionController,
    presets: PresetPanelState,
    sequencer: RequestSequencer,
    in_flight: Option<ProcessTicket>,
    theme: Theme,
    label_max_len: usize,
    status: Option<StatusMessage>,
}

impl Default for SpectraController {
    fn default() -> Self {
        Self::new(&SpecPlotConfig::default())
    }
}

impl SpectraController {
    pub fn new(cfg: &SpecPlotConfig) -> Self {
        let mut form = FormState::default();
        if !cfg.initial_form.is_empty() {
            form.apply_payload(&cfg.initial_form);
        }
        Self {
            store: DatasetStore::new(),
            result: None,
            traces: Vec::new(),
            form,
            interaction: InteractionController::new(cfg.delete_timeout()),
            presets: PresetPanelState::default(),
            sequencer: RequestSequencer::default(),
            in_flight: None,
            theme: cfg.theme,
            label_max_len: cfg.label_max_len,
            status: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    /// The trace list last handed to the chart.
    pub fn traces(&self) -> &[OverlayTrace] {
        &self.traces
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn presets(&self) -> &PresetPanelState {
        &self.presets
    }

    pub fn presets_mut(&mut self) -> &mut PresetPanelState {
        &mut self.presets
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn label_max_len(&self) -> usize {
        self.label_max_len
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Whether a processing request is outstanding.
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn layout(&self) -> ChartLayout {
        let title = if self.result.is_some() {
            "Processed spectra"
        } else {
            "Raw spectra"
        };
        ChartLayout {
            title: title.to_string(),
            dark: self.theme.is_dark(),
            ..ChartLayout::default()
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    /// Show a failed remote call in the status bar. A 401 from any backend
    /// call also locks the preset panel.
    pub fn report_error(&mut self, err: &SpecError) {
        log::error!("{err}");
        if err.is_unauthorized() {
            self.presets.lock();
        }
        self.set_status(StatusKind::Error, err.to_string());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Store mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Adopt parsed upload results, replacing or appending to the store.
    pub fn adopt_upload(
        &mut self,
        datasets: Vec<Dataset>,
        append: bool,
        chart: &mut dyn ChartAdapter,
    ) -> Result<()> {
        if datasets.is_empty() {
            return Err(SpecError::Validation("upload returned no spectra".into()));
        }
        let count = datasets.len();
        if append {
            self.store.append(datasets);
        } else {
            self.store.replace_all(datasets);
        }
        self.result = None;
        self.rebuild(chart)?;
        let verb = if append { "Added" } else { "Loaded" };
        self.set_status(
            StatusKind::Success,
            format!("{verb} {count} spectra ({} total)", self.store.len()),
        );
        Ok(())
    }

    pub fn remove_dataset(&mut self, index: usize, chart: &mut dyn ChartAdapter) -> Result<Dataset> {
        let removed = self.store.remove_at(index)?;
        self.result = None;
        self.interaction.reset();
        self.rebuild(chart)?;
        self.set_status(StatusKind::Info, format!("Removed {}", removed.label));
        Ok(removed)
    }

    pub fn clear(&mut self, chart: &mut dyn ChartAdapter) {
        self.store.clear();
        self.result = None;
        self.interaction.reset();
        self.traces.clear();
        chart.purge();
        self.set_status(StatusKind::Info, "All spectra cleared");
    }

    /// Recompose the overlay from the current store and result and render it.
    /// On failure the chart and the previous trace list are left untouched.
    pub fn rebuild(&mut self, chart: &mut dyn ChartAdapter) -> Result<()> {
        if self.store.is_empty() {
            self.traces.clear();
            self.interaction.reset();
            chart.purge();
            return Ok(());
        }
        let options = self.form.display_options(self.label_max_len);
        let traces = compose_overlay(&self.store, self.result.as_ref(), &options)?;
        self.show(traces, chart);
        Ok(())
    }

    fn show(&mut self, traces: Vec<OverlayTrace>, chart: &mut dyn ChartAdapter) {
        self.traces = traces;
        chart.render(&self.traces, &self.layout());
        self.interaction.reset();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Processing
    // ─────────────────────────────────────────────────────────────────────────

    /// Build the next processing request. Any request still in flight becomes
    /// stale.
    pub fn begin_process(&mut self) -> Result<(ProcessTicket, ProcessRequest)> {
        if self.store.is_empty() {
            return Err(SpecError::Validation("upload spectra before processing".into()));
        }
        let options = self.form.process_options()?;
        let ticket = self.sequencer.issue(self.store.generation());
        self.in_flight = Some(ticket);
        log::info!(
            "processing request #{} for {} datasets",
            ticket.seq,
            self.store.len()
        );
        Ok((ticket, ProcessRequest::from_store(&self.store, options)))
    }

    /// Fold a processing reply in. Returns `Ok(false)` when the reply was
    /// stale and discarded.
    pub fn complete_process(
        &mut self,
        ticket: ProcessTicket,
        response: Result<ProcessResponse>,
        chart: &mut dyn ChartAdapter,
    ) -> Result<bool> {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        if !self.sequencer.is_current(ticket, self.store.generation()) {
            log::debug!(
                "discarding stale processing reply #{} (latest #{}, store generation {} vs {})",
                ticket.seq,
                self.sequencer.latest(),
                ticket.store_generation,
                self.store.generation()
            );
            return Ok(false);
        }
        let result = ProcessingResult::from_response(response?, self.store.len())?;
        let options = self.form.display_options(self.label_max_len);
        let traces = compose_overlay(&self.store, Some(&result), &options)?;
        self.result = Some(result);
        self.show(traces, chart);
        self.set_status(StatusKind::Success, "Processing complete");
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────────────────────

    /// Edit a form field. Display-only fields re-render the current data.
    pub fn set_field(
        &mut self,
        id: &str,
        value: FieldValue,
        chart: &mut dyn ChartAdapter,
    ) -> Result<()> {
        let changed = self.form.set(id, value)?;
        if changed.is_some() && DISPLAY_FIELDS.contains(&id) {
            self.rebuild(chart)?;
        }
        Ok(())
    }

    /// Fold a preset reply in. Display fields changed by a loaded payload
    /// re-render the current data right away. Returns `true` when a payload
    /// was applied and the data should be reprocessed.
    pub fn apply_preset_reply(
        &mut self,
        reply: Result<PresetReply>,
        chart: &mut dyn ChartAdapter,
    ) -> bool {
        let Some(preset) = self.presets.apply(reply) else {
            return false;
        };
        let changes = self.form.apply_payload(&preset.payload);
        log::info!("preset '{}' applied ({} fields changed)", preset.name, changes.len());
        if changes.iter().any(|c| DISPLAY_FIELDS.contains(&c.id.as_str())) {
            if let Err(e) = self.rebuild(chart) {
                self.report_error(&e);
            }
        }
        !self.store.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Interaction
    // ─────────────────────────────────────────────────────────────────────────

    /// Pointer moved onto dataset `Some(i)`, or off every dataset.
    pub fn hover_dataset(&mut self, dataset: Option<usize>, chart: &mut dyn ChartAdapter) {
        match dataset {
            Some(i) => self.interaction.pointer_enter(i, &self.traces, chart),
            None => self.interaction.pointer_leave(&self.traces, chart),
        }
    }

    pub fn click_trace(
        &mut self,
        target: &ClickTarget,
        anchor: [f32; 2],
        now: Instant,
        chart: &mut dyn ChartAdapter,
    ) -> Option<usize> {
        self.interaction.click(
            target,
            &self.traces,
            self.store.labels(),
            self.label_max_len,
            anchor,
            now,
            chart,
        )
    }

    /// Remove the dataset the delete affordance points at.
    pub fn confirm_delete(&mut self, chart: &mut dyn ChartAdapter) -> Result<Option<Dataset>> {
        match self.interaction.confirm_delete() {
            Some(i) => self.remove_dataset(i, chart).map(Some),
            None => Ok(None),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.interaction.cancel_delete();
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.interaction.tick(now)
    }

    pub fn pending_delete(&self) -> Option<(usize, [f32; 2])> {
        match self.interaction.state() {
            HighlightState::PendingDelete { dataset, anchor } => Some((dataset, anchor)),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Theme, peak table, export, analysis
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_theme(&mut self, chart: &mut dyn ChartAdapter) {
        self.theme = self.theme.toggled();
        if !self.traces.is_empty() {
            chart.render(&self.traces, &self.layout());
            self.interaction.reset();
        }
    }

    /// Peak table rows, empty unless the table is enabled and peaks exist.
    pub fn peak_rows(&self) -> Vec<PeakRow> {
        match &self.result {
            Some(result) if self.form.checked("show_peak_table") => peak_rows(&self.store, result),
            _ => Vec::new(),
        }
    }

    pub fn mean_export_request(&self) -> Result<MeanExportRequest> {
        let result = self.require_result()?;
        MeanExportRequest::new(result, self.form.export_params())
    }

    pub fn processed_export_request(&self) -> Result<ProcessedExportRequest> {
        let result = self.require_result()?;
        Ok(ProcessedExportRequest::new(
            &self.store,
            result,
            self.form.export_params(),
        ))
    }

    /// Dataset `index` and the metadata sent along with an analysis request.
    pub fn analysis_input(&self, index: usize) -> Result<(Dataset, BTreeMap<String, String>)> {
        let d = self.store.get(index).ok_or(SpecError::OutOfRange {
            index,
            len: self.store.len(),
        })?;
        let dataset = Dataset::new(d.label, d.frequencies.to_vec(), d.amplitudes.to_vec());
        Ok((dataset, self.form.export_params()))
    }

    fn require_result(&self) -> Result<&ProcessingResult> {
        self.result
            .as_ref()
            .ok_or_else(|| SpecError::Validation("process the spectra before exporting".into()))
    }
}
