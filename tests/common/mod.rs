#![allow(dead_code)]

use specplot::chart::{AppliedStyle, ChartAdapter, ChartLayout, StyleDelta};
use specplot::data::dataset::{Dataset, DatasetStore};
use specplot::data::overlay::OverlayTrace;

#[derive(Debug, Clone, PartialEq)]
pub enum ChartCall {
    Render { names: Vec<String>, title: String, dark: bool },
    Restyle(Vec<(usize, StyleDelta)>),
    Purge,
}

/// Chart that records every call and tracks applied styles like a real surface.
#[derive(Debug, Default)]
pub struct RecordingChart {
    pub calls: Vec<ChartCall>,
    pub styles: Vec<AppliedStyle>,
}

impl ChartAdapter for RecordingChart {
    fn render(&mut self, traces: &[OverlayTrace], layout: &ChartLayout) {
        self.styles = traces.iter().map(AppliedStyle::of).collect();
        self.calls.push(ChartCall::Render {
            names: traces.iter().map(|t| t.name.clone()).collect(),
            title: layout.title.clone(),
            dark: layout.dark,
        });
    }

    fn restyle(&mut self, updates: &[(usize, StyleDelta)]) {
        for &(i, d) in updates {
            if let Some(s) = self.styles.get_mut(i) {
                s.apply(d);
            }
        }
        self.calls.push(ChartCall::Restyle(updates.to_vec()));
    }

    fn purge(&mut self) {
        self.styles.clear();
        self.calls.push(ChartCall::Purge);
    }
}

impl RecordingChart {
    pub fn render_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ChartCall::Render { .. }))
            .count()
    }

    pub fn last(&self) -> Option<&ChartCall> {
        self.calls.last()
    }
}

pub fn ds(label: &str, frequencies: &[f64], amplitudes: &[f64]) -> Dataset {
    Dataset::new(label, frequencies.to_vec(), amplitudes.to_vec())
}

/// Two spectra on the shared axis `[1, 2, 3]`.
pub fn two_spectra() -> Vec<Dataset> {
    vec![
        ds("A", &[1.0, 2.0, 3.0], &[1.0, 2.0, 1.0]),
        ds("B", &[1.0, 2.0, 3.0], &[3.0, 2.0, 3.0]),
    ]
}

pub fn store_with(datasets: Vec<Dataset>) -> DatasetStore {
    let mut store = DatasetStore::new();
    store.replace_all(datasets);
    store
}
