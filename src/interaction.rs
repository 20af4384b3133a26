//! Hover/click interaction over rendered traces.
//!
//! The controller is a small state machine:
//!
//! | From              | Event                    | To                   |
//! |-------------------|--------------------------|----------------------|
//! | Idle / any        | pointer enters dataset i | Highlighted(i)       |
//! | Highlighted(i)    | pointer leaves           | Idle                 |
//! | Idle / any        | click on a spectrum      | PendingDelete(i, at) |
//! | PendingDelete     | confirm                  | Idle (remove i)      |
//! | PendingDelete     | deadline passes          | Idle                 |
//!
//! Highlight and dim values are always computed from the base opacity/width
//! recorded on each trace, so any number of highlight cycles restores the
//! chart exactly. Entering a new state cancels a pending delete timer.

use std::time::{Duration, Instant};

use crate::chart::{ChartAdapter, StyleDelta};
use crate::data::overlay::{is_aggregate_name, spectrum_name, OverlayTrace, TraceRole};

/// How long the delete affordance stays up without confirmation.
pub const DELETE_CONFIRM_TIMEOUT: Duration = Duration::from_secs(3);

const DIM_FACTOR: f32 = 0.25;
const EMPHASIS_EXTRA_WIDTH: f32 = 2.0;
const DIM_WIDTH_FACTOR: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightState {
    Idle,
    Highlighted(usize),
    PendingDelete { dataset: usize, anchor: [f32; 2] },
}

/// What was clicked on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickTarget {
    /// Position in the rendered trace list, when the chart could tell.
    pub trace_index: Option<usize>,
    /// Display name of the clicked element.
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
struct DeleteTimer {
    deadline: Instant,
    generation: u64,
}

#[derive(Debug)]
pub struct InteractionController {
    state: HighlightState,
    timer: Option<DeleteTimer>,
    timer_generation: u64,
    timeout: Duration,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DELETE_CONFIRM_TIMEOUT)
    }
}

impl InteractionController {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: HighlightState::Idle,
            timer: None,
            timer_generation: 0,
            timeout,
        }
    }

    pub fn state(&self) -> HighlightState {
        self.state
    }

    /// Deadline of the pending delete affordance, if one is showing.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.timer.map(|t| t.deadline)
    }

    /// Pointer entered dataset `dataset`'s legend entry or label.
    pub fn pointer_enter(
        &mut self,
        dataset: usize,
        traces: &[OverlayTrace],
        chart: &mut dyn ChartAdapter,
    ) {
        if self.state == HighlightState::Highlighted(dataset) {
            return;
        }
        self.cancel_timer();
        let updates = highlight_updates(traces, dataset);
        if !updates.is_empty() {
            chart.restyle(&updates);
        }
        self.state = HighlightState::Highlighted(dataset);
    }

    /// Pointer left the legend entry. Only a highlight is undone by this.
    pub fn pointer_leave(&mut self, traces: &[OverlayTrace], chart: &mut dyn ChartAdapter) {
        if let HighlightState::Highlighted(_) = self.state {
            let updates = restore_updates(traces);
            if !updates.is_empty() {
                chart.restyle(&updates);
            }
            self.state = HighlightState::Idle;
        }
    }

    /// Click on a chart element. Spectrum traces open the delete affordance
    /// anchored at `anchor`; returns the dataset it targets.
    #[allow(clippy::too_many_arguments)]
    pub fn click(
        &mut self,
        target: &ClickTarget,
        traces: &[OverlayTrace],
        labels: &[String],
        label_max_len: usize,
        anchor: [f32; 2],
        now: Instant,
        chart: &mut dyn ChartAdapter,
    ) -> Option<usize> {
        let dataset = resolve_click(target, traces, labels, label_max_len)?;
        self.pointer_leave(traces, chart);
        self.cancel_timer();
        self.timer_generation += 1;
        self.timer = Some(DeleteTimer {
            deadline: now + self.timeout,
            generation: self.timer_generation,
        });
        self.state = HighlightState::PendingDelete { dataset, anchor };
        log::debug!("delete affordance shown for dataset {dataset}");
        Some(dataset)
    }

    /// Confirm the pending delete. Returns the dataset to remove.
    pub fn confirm_delete(&mut self) -> Option<usize> {
        match self.state {
            HighlightState::PendingDelete { dataset, .. } => {
                self.cancel_timer();
                self.state = HighlightState::Idle;
                Some(dataset)
            }
            _ => None,
        }
    }

    pub fn cancel_delete(&mut self) {
        if let HighlightState::PendingDelete { .. } = self.state {
            self.cancel_timer();
            self.state = HighlightState::Idle;
        }
    }

    /// Advance time. Returns `true` when a pending delete expired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer else {
            return false;
        };
        if timer.generation != self.timer_generation || now < timer.deadline {
            return false;
        }
        self.timer = None;
        if let HighlightState::PendingDelete { dataset, .. } = self.state {
            log::debug!("delete affordance for dataset {dataset} timed out");
            self.state = HighlightState::Idle;
            return true;
        }
        false
    }

    /// Forget all interaction state. Called after every full render, since a
    /// render discards restyles and may renumber traces.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.state = HighlightState::Idle;
    }

    fn cancel_timer(&mut self) {
        if self.timer.take().is_some() {
            self.timer_generation += 1;
        }
    }
}

/// Style updates emphasising dataset `dataset` and dimming every other
/// dataset-tagged trace. Untagged (aggregate) traces are left out.
pub fn highlight_updates(traces: &[OverlayTrace], dataset: usize) -> Vec<(usize, StyleDelta)> {
    traces
        .iter()
        .enumerate()
        .filter_map(|(i, tr)| {
            let owner = tr.dataset_index()?;
            let delta = if owner == dataset {
                let d = StyleDelta::opacity(tr.base_opacity);
                if tr.look.is_line() {
                    d.with_width(tr.base_width + EMPHASIS_EXTRA_WIDTH)
                } else {
                    d
                }
            } else {
                let d = StyleDelta::opacity((tr.base_opacity * DIM_FACTOR).clamp(0.0, 1.0));
                if tr.look.is_line() {
                    d.with_width((tr.base_width * DIM_WIDTH_FACTOR).max(1.0))
                } else {
                    d
                }
            };
            Some((i, delta))
        })
        .collect()
}

/// Style updates putting every trace back to its recorded base values.
pub fn restore_updates(traces: &[OverlayTrace]) -> Vec<(usize, StyleDelta)> {
    traces
        .iter()
        .enumerate()
        .map(|(i, tr)| {
            let d = StyleDelta::opacity(tr.base_opacity);
            let d = if tr.look.is_line() {
                d.with_width(tr.base_width)
            } else {
                d
            };
            (i, d)
        })
        .collect()
}

/// Dataset targeted by a click, if the element is a dataset's spectrum.
pub fn resolve_click(
    target: &ClickTarget,
    traces: &[OverlayTrace],
    labels: &[String],
    label_max_len: usize,
) -> Option<usize> {
    if is_aggregate_name(&target.name) {
        return None;
    }
    match target.trace_index.and_then(|i| traces.get(i)) {
        Some(tr) if tr.role() == TraceRole::Spectrum => tr
            .dataset_index()
            .or_else(|| resolve_by_name(&target.name, labels, label_max_len)),
        Some(_) => None,
        None => resolve_by_name(&target.name, labels, label_max_len),
    }
}

/// Legacy lookup by truncated label. Two labels that truncate to the same
/// text are indistinguishable; the first one wins.
pub fn resolve_by_name(name: &str, labels: &[String], label_max_len: usize) -> Option<usize> {
    labels
        .iter()
        .enumerate()
        .position(|(i, label)| spectrum_name(label, i, label_max_len) == name)
}
